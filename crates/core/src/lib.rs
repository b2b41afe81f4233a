//! Core business logic for Innkeep.
//!
//! This crate holds the reservation ledger and room availability rules with
//! ZERO web or database dependencies. Persistence is reached through the
//! [`store::Store`] trait; the Postgres implementation lives in `innkeep-db`.
//!
//! # Modules
//!
//! - `catalog` - Service catalog validation
//! - `availability` - Room double-booking rules
//! - `ledger` - Service lines, payments and the derived folio
//! - `registry` - Room and customer input rules
//! - `facade` - Transactional entry point combining all of the above
//! - `store` - Persistence contract and an in-memory implementation
//! - `authz`, `audit`, `clock`, `sanitize` - Injected collaborators

pub mod audit;
pub mod authz;
pub mod availability;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod facade;
pub mod ledger;
pub mod model;
pub mod registry;
pub mod sanitize;
pub mod store;

pub use error::{ErrorKind, HotelError};
pub use facade::ReconciliationFacade;
