//! Money type stored as integer minor units.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are whole cents (`i64`) with a fixed scale of 2. Decimal text and
//! `rust_decimal::Decimal` values are only accepted or produced at the
//! boundary, and every inbound conversion rounds half away from zero.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of fraction digits carried by every amount.
pub const SCALE: u32 = 2;

/// A monetary amount in minor units (cents).
///
/// The single currency of the hotel is implied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

/// Errors raised while converting or bounding an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The text is not a decimal number.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// The amount is outside the accepted range.
    #[error("amount {amount} is outside the accepted range [{min}, {max}]")]
    OutOfRange {
        /// Offending amount.
        amount: Money,
        /// Lower bound (inclusive).
        min: Money,
        /// Upper bound (inclusive).
        max: Money,
    },

    /// The amount does not fit in minor units.
    #[error("amount overflow")]
    Overflow,
}

/// Inclusive range an amount must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoneyBounds {
    /// Smallest accepted amount.
    pub min: Money,
    /// Largest accepted amount.
    pub max: Money,
}

impl MoneyBounds {
    /// Bounds for a single payment or refund, and for catalog prices.
    pub const PAYMENT: Self = Self {
        min: Money::from_minor(1),
        max: Money::from_minor(99_999_999),
    };

    /// Bounds for the room charge agreed at booking time.
    pub const RESERVATION_BASE: Self = Self {
        min: Money::from_minor(1),
        max: Money::from_minor(9_999_999_999),
    };

    /// Returns true if `amount` lies within the bounds.
    #[must_use]
    pub fn contains(&self, amount: Money) -> bool {
        amount >= self.min && amount <= self.max
    }

    /// Returns `amount` unchanged when it lies within the bounds.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::OutOfRange` otherwise.
    pub fn check(&self, amount: Money) -> Result<Money, MoneyError> {
        if self.contains(amount) {
            Ok(amount)
        } else {
            Err(MoneyError::OutOfRange {
                amount,
                min: self.min,
                max: self.max,
            })
        }
    }
}

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Differences strictly below this are settlement noise and count as zero.
    pub const SETTLEMENT_TOLERANCE: Self = Self(1);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Converts a decimal, rounding half away from zero to 2 places.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the rounded value does not fit.
    pub fn from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        value
            .round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    /// Parses decimal text such as `"25.50"` or `"7"`.
    ///
    /// Surrounding whitespace is ignored. Extra fraction digits are rounded
    /// half away from zero.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` for text that is not a decimal.
    pub fn from_decimal_str(s: &str) -> Result<Self, MoneyError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyError::InvalidAmount(s.to_string()));
        }
        let value =
            Decimal::from_str(trimmed).map_err(|_| MoneyError::InvalidAmount(s.to_string()))?;
        Self::from_decimal(value)
    }

    /// Returns the amount as a `Decimal` with scale 2.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, SCALE)
    }

    /// Formats the amount with exactly two fraction digits.
    #[must_use]
    pub fn to_decimal_string(self) -> String {
        self.to_string()
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Adds two amounts, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Subtracts two amounts, returning `None` on overflow.
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Subtracts `other`, clamping the result at zero.
    #[must_use]
    pub const fn clamped_sub(self, other: Self) -> Self {
        let diff = self.0.saturating_sub(other.0);
        if diff < 0 { Self::ZERO } else { Self(diff) }
    }

    /// Multiplies a unit amount by a quantity.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the product does not fit.
    pub fn multiply_by_quantity(self, quantity: i64) -> Result<Self, MoneyError> {
        self.0
            .checked_mul(quantity)
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

/// Accepts decimal strings and whole numbers. Floats are refused.
struct MoneyVisitor;

impl Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal string such as \"25.50\" or a whole number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Money::from_decimal_str(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        v.checked_mul(100)
            .map(Money::from_minor)
            .ok_or_else(|| E::custom(MoneyError::Overflow))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map_err(|_| E::custom(MoneyError::Overflow))
            .and_then(|v| self.visit_i64(v))
    }
}
