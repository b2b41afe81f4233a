//! Rooms.

use chrono::{DateTime, Utc};
use innkeep_shared::types::{Money, RoomId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    /// One guest.
    Single,
    /// One large bed.
    Double,
    /// Two separate beds.
    Twin,
    /// Suite.
    Suite,
    /// Family room.
    Family,
}

impl RoomType {
    /// Returns the string representation of the room type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Twin => "twin",
            Self::Suite => "suite",
            Self::Family => "family",
        }
    }

    /// Parses a room type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "single" => Some(Self::Single),
            "double" => Some(Self::Double),
            "twin" => Some(Self::Twin),
            "suite" => Some(Self::Suite),
            "family" => Some(Self::Family),
            _ => None,
        }
    }
}

/// Housekeeping state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomState {
    /// Ready for guests.
    #[default]
    Available,
    /// A guest is in the room.
    Occupied,
    /// Temporarily under maintenance, still bookable.
    Maintenance,
    /// Withdrawn from sale. Cannot accept new reservations.
    OutOfService,
}

impl RoomState {
    /// Returns the string representation of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
            Self::OutOfService => "out_of_service",
        }
    }

    /// Parses a state from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "available" => Some(Self::Available),
            "occupied" => Some(Self::Occupied),
            "maintenance" => Some(Self::Maintenance),
            "out_of_service" => Some(Self::OutOfService),
            _ => None,
        }
    }

    /// Returns true if new reservations may target a room in this state.
    #[must_use]
    pub const fn accepts_reservations(&self) -> bool {
        !matches!(self, Self::OutOfService)
    }
}

impl fmt::Display for RoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room ID.
    pub id: RoomId,
    /// Door number, unique among active rooms.
    pub number: String,
    /// Kind of room.
    pub room_type: RoomType,
    /// Housekeeping state.
    pub state: RoomState,
    /// Maximum number of guests.
    pub capacity: i32,
    /// Nightly list price.
    pub price: Money,
    /// Set when the room is withdrawn from the registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_state_parse_roundtrip() {
        for state in [
            RoomState::Available,
            RoomState::Occupied,
            RoomState::Maintenance,
            RoomState::OutOfService,
        ] {
            assert_eq!(RoomState::parse(state.as_str()), Some(state));
        }
        assert_eq!(RoomState::parse("closed"), None);
    }

    #[test]
    fn test_only_out_of_service_blocks_bookings() {
        assert!(RoomState::Available.accepts_reservations());
        assert!(RoomState::Occupied.accepts_reservations());
        assert!(RoomState::Maintenance.accepts_reservations());
        assert!(!RoomState::OutOfService.accepts_reservations());
    }

    #[test]
    fn test_room_type_parse_is_case_insensitive() {
        assert_eq!(RoomType::parse("Suite"), Some(RoomType::Suite));
        assert_eq!(RoomType::parse("penthouse"), None);
    }
}
