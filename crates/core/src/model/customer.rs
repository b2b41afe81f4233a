//! Customers.

use chrono::{DateTime, Utc};
use innkeep_shared::types::CustomerId;
use serde::{Deserialize, Serialize};

/// A hotel guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer ID.
    pub id: CustomerId,
    /// Sanitized full name.
    pub full_name: String,
    /// Normalized phone number, unique among active customers.
    pub phone: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Set when the customer is withdrawn from the registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}
