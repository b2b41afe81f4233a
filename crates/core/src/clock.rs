//! Injected time source.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::HotelError;

/// Source of the current instant and of the hotel's calendar day.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Calendar day at the hotel.
    fn today(&self) -> NaiveDate;
}

/// Wall clock, with "today" taken in the hotel's timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    /// Creates a clock for the given timezone.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Creates a clock from an IANA timezone name such as `Europe/Paris`.
    ///
    /// # Errors
    ///
    /// Returns `HotelError::Validation` if the name is unknown.
    pub fn from_name(name: &str) -> Result<Self, HotelError> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| HotelError::Validation(format!("unknown timezone {name:?}")))
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Creates a clock that always reports `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Creates a clock at noon UTC on the given day.
    #[must_use]
    pub fn at_noon(day: NaiveDate) -> Self {
        Self::new(day.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let day = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let clock = FixedClock::at_noon(day);
        assert_eq!(clock.today(), day);
        assert_eq!(clock.now().date_naive(), day);
    }

    #[test]
    fn test_system_clock_from_name() {
        assert!(SystemClock::from_name("Europe/Paris").is_ok());
        assert!(matches!(
            SystemClock::from_name("Mars/Olympus"),
            Err(HotelError::Validation(_))
        ));
    }
}
