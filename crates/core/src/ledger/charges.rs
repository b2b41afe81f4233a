//! Reservation charges: base room charge plus attached service lines.

use chrono::{DateTime, Utc};
use innkeep_shared::types::{Money, MoneyError, ReservationId, ServiceItemId, ServiceLineId};

use crate::error::HotelError;
use crate::model::{Reservation, ServiceItem, ServiceLine};

/// Largest quantity accepted on a single line.
pub const MAX_QUANTITY: i32 = 9_999;

/// Charge-side ledger of one reservation.
///
/// All functions are pure. The facade loads the lines, calls these, and
/// persists the result.
pub struct ReservationLedger;

impl ReservationLedger {
    /// Validates a line quantity.
    ///
    /// # Errors
    ///
    /// Returns `HotelError::InvalidQuantity` outside `1..=9999`.
    pub fn validate_quantity(quantity: i64) -> Result<i32, HotelError> {
        i32::try_from(quantity)
            .ok()
            .filter(|q| (1..=MAX_QUANTITY).contains(q))
            .ok_or(HotelError::InvalidQuantity(quantity))
    }

    /// Returns true if `item` is already attached.
    #[must_use]
    pub fn has_service(lines: &[ServiceLine], item: ServiceItemId) -> bool {
        lines.iter().any(|l| l.service_item_id == item)
    }

    /// Builds a new line for `item`, freezing its current price.
    ///
    /// # Errors
    ///
    /// Returns `HotelError::InvalidQuantity` or `HotelError::AlreadyAttached`.
    pub fn attach(
        reservation: &Reservation,
        lines: &[ServiceLine],
        item: &ServiceItem,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> Result<ServiceLine, HotelError> {
        let quantity = Self::validate_quantity(quantity)?;
        if Self::has_service(lines, item.id) {
            return Err(HotelError::AlreadyAttached {
                reservation: reservation.id,
                service: item.id,
            });
        }
        Ok(ServiceLine {
            id: ServiceLineId::new(),
            reservation_id: reservation.id,
            service_item_id: item.id,
            unit_price: item.unit_price,
            quantity,
            created_at: now,
        })
    }

    /// Finds the line to detach.
    ///
    /// # Errors
    ///
    /// Returns `HotelError::ServiceLineNotFound` if the line is not on this
    /// reservation.
    pub fn detach(
        reservation: ReservationId,
        lines: &[ServiceLine],
        line: ServiceLineId,
    ) -> Result<&ServiceLine, HotelError> {
        lines
            .iter()
            .find(|l| l.id == line && l.reservation_id == reservation)
            .ok_or(HotelError::ServiceLineNotFound { reservation, line })
    }

    /// Returns the line with its quantity replaced.
    ///
    /// # Errors
    ///
    /// Returns `HotelError::InvalidQuantity` or `HotelError::ServiceLineNotFound`.
    pub fn update_quantity(
        reservation: ReservationId,
        lines: &[ServiceLine],
        line: ServiceLineId,
        quantity: i64,
    ) -> Result<ServiceLine, HotelError> {
        let quantity = Self::validate_quantity(quantity)?;
        let mut updated = Self::detach(reservation, lines, line)?.clone();
        updated.quantity = quantity;
        Ok(updated)
    }

    /// Sum of line subtotals.
    ///
    /// # Errors
    ///
    /// Returns `HotelError::InvalidAmount` on overflow.
    pub fn services_total(lines: &[ServiceLine]) -> Result<Money, HotelError> {
        lines.iter().try_fold(Money::ZERO, |acc, line| {
            let subtotal = line.subtotal()?;
            acc.checked_add(subtotal)
                .ok_or(HotelError::InvalidAmount(MoneyError::Overflow))
        })
    }

    /// Base plus sum of line subtotals. Always recomputed, never read from
    /// the stored cache.
    ///
    /// # Errors
    ///
    /// Returns `HotelError::InvalidAmount` on overflow.
    pub fn total(base: Money, lines: &[ServiceLine]) -> Result<Money, HotelError> {
        base.checked_add(Self::services_total(lines)?)
            .ok_or(HotelError::InvalidAmount(MoneyError::Overflow))
    }
}
