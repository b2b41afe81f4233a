//! Reservation folio: the reservation with its charges, payments and
//! derived balances.

use innkeep_shared::types::Money;
use serde::Serialize;

use super::{PaymentLedger, ReservationLedger};
use crate::error::HotelError;
use crate::model::{Payment, PaymentStatus, Reservation, ServiceLine};

/// Derived view of one reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationFolio {
    /// The reservation record.
    pub reservation: Reservation,
    /// Attached services.
    pub lines: Vec<ServiceLine>,
    /// Payments and refunds.
    pub payments: Vec<Payment>,
    /// Base plus services.
    pub total: Money,
    /// Payments minus refunds, floored at zero.
    pub amount_paid: Money,
    /// What is still due.
    pub amount_remaining: Money,
    /// Settlement state.
    pub payment_status: PaymentStatus,
}

impl ReservationFolio {
    /// Derives the folio from the stored records.
    ///
    /// # Errors
    ///
    /// Returns `HotelError::InvalidAmount` on overflow.
    pub fn build(
        reservation: Reservation,
        lines: Vec<ServiceLine>,
        payments: Vec<Payment>,
    ) -> Result<Self, HotelError> {
        let total = ReservationLedger::total(reservation.base_amount, &lines)?;
        let amount_paid = PaymentLedger::amount_paid(&payments);
        Ok(Self {
            amount_remaining: PaymentLedger::amount_remaining(total, amount_paid),
            payment_status: PaymentLedger::status(total, amount_paid),
            reservation,
            lines,
            payments,
            total,
            amount_paid,
        })
    }

    /// Returns true if the stored total cache disagrees with the derived one.
    #[must_use]
    pub fn is_total_stale(&self) -> bool {
        self.reservation.stored_total != self.total
    }
}
