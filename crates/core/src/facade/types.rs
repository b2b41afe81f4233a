//! Inputs accepted by the facade.

use chrono::{DateTime, NaiveDate, Utc};
use innkeep_shared::types::{CustomerId, Money, RoomId};
use serde::Deserialize;

use crate::model::{PaymentMethod, PaymentType, ReservationStatus};

/// Input for a new reservation. The creator is the acting user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReservationInput {
    /// Room to book.
    pub room_id: RoomId,
    /// Guest.
    pub customer_id: CustomerId,
    /// First night.
    pub start_date: NaiveDate,
    /// Departure day.
    pub end_date: NaiveDate,
    /// Agreed room charge.
    pub base_amount: Money,
    /// Initial status, `pending` when absent.
    #[serde(default)]
    pub status: Option<ReservationStatus>,
}

/// Partial update of a reservation. Absent fields are unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReservationInput {
    /// Move to another room.
    pub room_id: Option<RoomId>,
    /// New first night.
    pub start_date: Option<NaiveDate>,
    /// New departure day.
    pub end_date: Option<NaiveDate>,
    /// New status.
    pub status: Option<ReservationStatus>,
    /// New agreed room charge.
    pub base_amount: Option<Money>,
}

impl UpdateReservationInput {
    /// Returns true if the room or the dates change.
    #[must_use]
    pub const fn moves_stay(&self) -> bool {
        self.room_id.is_some() || self.start_date.is_some() || self.end_date.is_some()
    }
}

/// Input for a payment or refund.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPaymentInput {
    /// Positive amount.
    pub amount: Money,
    /// How the money moved.
    pub method: PaymentMethod,
    /// Purpose, `balance` when absent.
    #[serde(default)]
    pub payment_type: PaymentType,
    /// When the money moved, now when absent.
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    /// External transaction reference.
    #[serde(default)]
    pub transaction_ref: Option<String>,
    /// Free-text comment.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Rename and/or reprice of a catalog service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateServiceInput {
    /// New name.
    pub name: Option<String>,
    /// New unit price.
    pub unit_price: Option<Money>,
}
