//! Reservation ledgers.
//!
//! This module implements the derived financial view of a reservation:
//! - Charges (base room charge plus service lines)
//! - Payments and refunds
//! - The folio combining both

pub mod charges;
pub mod folio;
pub mod payments;

#[cfg(test)]
mod charges_props;
#[cfg(test)]
mod payments_props;

pub use charges::{MAX_QUANTITY, ReservationLedger};
pub use folio::ReservationFolio;
pub use payments::{PaymentLedger, PaymentRequest};
