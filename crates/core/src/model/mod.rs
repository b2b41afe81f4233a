//! Domain records shared by the ledgers, the facade and the stores.
//!
//! These are plain data. Validation and derived values live in the
//! `catalog`, `availability`, `ledger` and `registry` modules.

pub mod customer;
pub mod payment;
pub mod reservation;
pub mod room;
pub mod service;
pub mod user;

pub use customer::Customer;
pub use payment::{Payment, PaymentMethod, PaymentStatus, PaymentType};
pub use reservation::{DateRange, Reservation, ReservationStatus};
pub use room::{Room, RoomState, RoomType};
pub use service::{ServiceItem, ServiceLine};
pub use user::{Role, User};
