//! Payments and refunds recorded against a reservation.

use chrono::{DateTime, Utc};
use innkeep_shared::types::{Money, PaymentId, ReservationId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the money moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash at the desk.
    Cash,
    /// Card terminal.
    Card,
    /// Cheque.
    Check,
    /// Bank transfer.
    Transfer,
    /// PayPal.
    Paypal,
    /// Other online payment.
    Online,
}

impl PaymentMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Check => "check",
            Self::Transfer => "transfer",
            Self::Paypal => "paypal",
            Self::Online => "online",
        }
    }

    /// Parses a method from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "card" => Some(Self::Card),
            "check" => Some(Self::Check),
            "transfer" => Some(Self::Transfer),
            "paypal" => Some(Self::Paypal),
            "online" => Some(Self::Online),
            _ => None,
        }
    }
}

/// Purpose of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Advance payment.
    Deposit,
    /// Regular settlement.
    #[default]
    Balance,
    /// Money returned to the guest. Subtracted from the amount paid.
    Refund,
    /// Fee collected against the reservation.
    Fee,
}

impl PaymentType {
    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Balance => "balance",
            Self::Refund => "refund",
            Self::Fee => "fee",
        }
    }

    /// Parses a type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deposit" => Some(Self::Deposit),
            "balance" => Some(Self::Balance),
            "refund" => Some(Self::Refund),
            "fee" => Some(Self::Fee),
            _ => None,
        }
    }

    /// Returns true for refunds.
    #[must_use]
    pub const fn is_refund(&self) -> bool {
        matches!(self, Self::Refund)
    }
}

/// Derived settlement state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Nothing paid.
    #[serde(rename = "impaye")]
    Unpaid,
    /// Partly paid.
    #[serde(rename = "partiel")]
    Partial,
    /// Settled within tolerance.
    #[serde(rename = "complet")]
    Complete,
}

impl PaymentStatus {
    /// Returns the wire representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "impaye",
            Self::Partial => "partiel",
            Self::Complete => "complet",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment ID.
    pub id: PaymentId,
    /// Owning reservation.
    pub reservation_id: ReservationId,
    /// Positive amount, whatever the type.
    pub amount: Money,
    /// How the money moved.
    pub method: PaymentMethod,
    /// Purpose.
    pub payment_type: PaymentType,
    /// When the money moved. Never in the future.
    pub paid_at: DateTime<Utc>,
    /// External transaction reference.
    pub transaction_ref: Option<String>,
    /// Free-text comment.
    pub comment: Option<String>,
    /// User who recorded the entry.
    pub recorded_by: UserId,
    /// Recording time.
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Contribution to the amount paid: negative for refunds.
    #[must_use]
    pub fn signed_amount(&self) -> Money {
        if self.payment_type.is_refund() {
            -self.amount
        } else {
            self.amount
        }
    }
}
