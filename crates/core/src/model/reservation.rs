//! Reservations, their date ranges and their lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use innkeep_shared::types::{CustomerId, Money, ReservationId, RoomId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::HotelError;

/// Half-open stay interval `[start, end)`.
///
/// `start` is the first night, `end` the departure day. A reservation ending
/// on a given day never blocks one starting that same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First night.
    pub start: NaiveDate,
    /// Departure day, excluded.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, requiring `end > start`.
    ///
    /// # Errors
    ///
    /// Returns `HotelError::InvalidDateRange` when `end <= start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, HotelError> {
        if end <= start {
            return Err(HotelError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Number of nights in the stay.
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Returns true if the two ranges share at least one night.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Reservation lifecycle status.
///
/// The forward chain is `pending -> confirmed -> in_progress -> completed`;
/// any non-completed reservation may be cancelled. Payment state is a
/// separate axis and never moves this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Booked, awaiting confirmation.
    #[default]
    Pending,
    /// Confirmed by the hotel.
    Confirmed,
    /// Guest checked in.
    InProgress,
    /// Guest checked out.
    Completed,
    /// Cancelled. Never blocks availability.
    Cancelled,
}

impl ReservationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Position on the forward chain. `None` for cancelled.
    const fn rank(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Confirmed => Some(1),
            Self::InProgress => Some(2),
            Self::Completed => Some(3),
            Self::Cancelled => None,
        }
    }

    /// Returns true if a reservation may be created in this status.
    #[must_use]
    pub const fn is_valid_initial(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::InProgress)
    }

    /// Returns true if the reservation occupies its room.
    #[must_use]
    pub const fn blocks_availability(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Returns true if moving from `self` to `next` is allowed.
    ///
    /// Staying put is always allowed. Forward moves may skip steps.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        if self == next {
            return true;
        }
        match (self.rank(), next.rank()) {
            (Some(from), Some(to)) => to > from,
            (Some(_), None) => self != Self::Completed,
            (None, _) => false,
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A room booking.
///
/// `stored_total` is a denormalized cache of base plus service lines. It is
/// rewritten on every mutation and never trusted on read; see
/// [`crate::ledger::ReservationLedger::total`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Reservation ID.
    pub id: ReservationId,
    /// Booked room.
    pub room_id: RoomId,
    /// Guest.
    pub customer_id: CustomerId,
    /// User who created the booking.
    pub created_by: UserId,
    /// Stay interval.
    pub dates: DateRange,
    /// Lifecycle status.
    pub status: ReservationStatus,
    /// Room charge agreed at booking.
    pub base_amount: Money,
    /// Cached total.
    pub stored_total: Money,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::{Cancelled, Completed, Confirmed, InProgress, Pending};

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    #[test]
    fn test_date_range_requires_end_after_start() {
        assert!(DateRange::new(d(6, 1), d(6, 5)).is_ok());
        assert!(matches!(
            DateRange::new(d(6, 5), d(6, 5)),
            Err(HotelError::InvalidDateRange { .. })
        ));
        assert!(DateRange::new(d(6, 5), d(6, 1)).is_err());
    }

    #[test]
    fn test_date_range_nights() {
        assert_eq!(DateRange::new(d(6, 1), d(6, 5)).unwrap().nights(), 4);
        assert_eq!(DateRange::new(d(5, 31), d(6, 1)).unwrap().nights(), 1);
    }

    #[test]
    fn test_half_open_overlap() {
        let booked = DateRange::new(d(6, 1), d(6, 5)).unwrap();
        assert!(booked.overlaps(&DateRange::new(d(6, 4), d(6, 6)).unwrap()));
        assert!(booked.overlaps(&DateRange::new(d(5, 30), d(6, 2)).unwrap()));
        assert!(booked.overlaps(&DateRange::new(d(6, 2), d(6, 3)).unwrap()));
        assert!(!booked.overlaps(&DateRange::new(d(6, 5), d(6, 7)).unwrap()));
        assert!(!booked.overlaps(&DateRange::new(d(5, 28), d(6, 1)).unwrap()));
    }

    #[test]
    fn test_forward_transitions() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Confirmed));
    }

    #[test]
    fn test_backward_transitions_rejected() {
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(InProgress));
    }

    #[test]
    fn test_cancellation_rules() {
        assert!(Pending.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn test_initial_statuses() {
        assert!(Pending.is_valid_initial());
        assert!(InProgress.is_valid_initial());
        assert!(!Completed.is_valid_initial());
        assert!(!Cancelled.is_valid_initial());
    }

    #[test]
    fn test_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(ReservationStatus::parse("CANCELLED"), Some(Cancelled));
    }
}
