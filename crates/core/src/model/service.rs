//! Catalog services and the lines that attach them to reservations.

use chrono::{DateTime, Utc};
use innkeep_shared::types::{Money, MoneyError, ReservationId, ServiceItemId, ServiceLineId};
use serde::{Deserialize, Serialize};

/// A named, priced add-on a reservation can attach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceItem {
    /// Service ID.
    pub id: ServiceItemId,
    /// Sanitized display name, unique case-insensitively.
    pub name: String,
    /// Current list price. Existing lines keep their own copy.
    pub unit_price: Money,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A service attached to one reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLine {
    /// Line ID.
    pub id: ServiceLineId,
    /// Owning reservation.
    pub reservation_id: ReservationId,
    /// Referenced catalog service.
    pub service_item_id: ServiceItemId,
    /// Unit price frozen when the line was attached.
    pub unit_price: Money,
    /// Quantity, at least 1.
    pub quantity: i32,
    /// Attach time.
    pub created_at: DateTime<Utc>,
}

impl ServiceLine {
    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the product does not fit.
    pub fn subtotal(&self) -> Result<Money, MoneyError> {
        self.unit_price
            .multiply_by_quantity(i64::from(self.quantity))
    }
}
