//! Entity re-exports.

pub use super::customers::Entity as Customers;
pub use super::payments::Entity as Payments;
pub use super::reservation_services::Entity as ReservationServices;
pub use super::reservations::Entity as Reservations;
pub use super::rooms::Entity as Rooms;
pub use super::service_items::Entity as ServiceItems;
pub use super::users::Entity as Users;
