//! Room availability: decides whether a stay conflicts with existing bookings.
//!
//! This check is the last gate before a reservation's room or dates are
//! written. The store's exclusion constraint backs it up against races.

use innkeep_shared::types::{ReservationId, RoomId};

use crate::error::HotelError;
use crate::model::{DateRange, Reservation};

/// Availability rules.
pub struct RoomAvailability;

impl RoomAvailability {
    /// Returns the first reservation that blocks `room` for `range`.
    ///
    /// A reservation blocks when it is for the same room, is not cancelled,
    /// is not `exclude`, and `existing.start < range.end && existing.end >
    /// range.start`.
    pub fn find_conflict<'a, I>(
        existing: I,
        room: RoomId,
        range: &DateRange,
        exclude: Option<ReservationId>,
    ) -> Option<&'a Reservation>
    where
        I: IntoIterator<Item = &'a Reservation>,
    {
        existing.into_iter().find(|r| {
            r.room_id == room
                && r.status.blocks_availability()
                && Some(r.id) != exclude
                && r.dates.overlaps(range)
        })
    }

    /// Returns true if `room` is occupied for any night of `range`.
    pub fn is_occupied<'a, I>(
        existing: I,
        room: RoomId,
        range: &DateRange,
        exclude: Option<ReservationId>,
    ) -> bool
    where
        I: IntoIterator<Item = &'a Reservation>,
    {
        Self::find_conflict(existing, room, range, exclude).is_some()
    }

    /// Fails with `RoomUnavailable` if `room` is occupied for `range`.
    ///
    /// # Errors
    ///
    /// Returns `HotelError::RoomUnavailable` naming the blocking reservation.
    pub fn ensure_available<'a, I>(
        existing: I,
        room: RoomId,
        range: &DateRange,
        exclude: Option<ReservationId>,
    ) -> Result<(), HotelError>
    where
        I: IntoIterator<Item = &'a Reservation>,
    {
        match Self::find_conflict(existing, room, range, exclude) {
            Some(conflict) => Err(HotelError::RoomUnavailable {
                room,
                range: *range,
                conflicting: Some(conflict.id),
            }),
            None => Ok(()),
        }
    }
}
