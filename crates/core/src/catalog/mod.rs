//! Service catalog: named, priced add-ons a reservation can attach.
//!
//! Only validation lives here. Uniqueness and in-use checks need the store
//! and are run by the facade.

pub mod name;

use chrono::{DateTime, Utc};
use innkeep_shared::types::{Money, MoneyBounds, ServiceItemId};

pub use name::validate_service_name;

use crate::error::HotelError;
use crate::model::ServiceItem;
use crate::sanitize::Sanitizer;

/// Catalog rules.
pub struct ServiceCatalog;

impl ServiceCatalog {
    /// Validates a catalog unit price.
    ///
    /// # Errors
    ///
    /// Returns `HotelError::InvalidAmount` outside `[0.01, 999,999.99]`.
    pub fn validate_price(price: Money) -> Result<Money, HotelError> {
        Ok(MoneyBounds::PAYMENT.check(price)?)
    }

    /// Builds a new catalog entry from raw input.
    ///
    /// # Errors
    ///
    /// Returns `HotelError::InvalidName` or `HotelError::InvalidAmount`.
    pub fn prepare_new(
        sanitizer: &dyn Sanitizer,
        raw_name: &str,
        price: Money,
        now: DateTime<Utc>,
    ) -> Result<ServiceItem, HotelError> {
        let name = validate_service_name(sanitizer, raw_name)?;
        let unit_price = Self::validate_price(price)?;
        Ok(ServiceItem {
            id: ServiceItemId::new(),
            name,
            unit_price,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a rename and/or reprice to an existing entry.
    ///
    /// Lines already attached keep their frozen price.
    ///
    /// # Errors
    ///
    /// Returns `HotelError::InvalidName` or `HotelError::InvalidAmount`.
    pub fn apply_update(
        sanitizer: &dyn Sanitizer,
        item: &ServiceItem,
        raw_name: Option<&str>,
        price: Option<Money>,
        now: DateTime<Utc>,
    ) -> Result<ServiceItem, HotelError> {
        let mut updated = item.clone();
        if let Some(raw) = raw_name {
            updated.name = validate_service_name(sanitizer, raw)?;
        }
        if let Some(price) = price {
            updated.unit_price = Self::validate_price(price)?;
        }
        if updated != *item {
            updated.updated_at = now;
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::MarkupSanitizer;

    #[test]
    fn test_price_bounds() {
        assert!(ServiceCatalog::validate_price(Money::from_minor(1)).is_ok());
        assert!(ServiceCatalog::validate_price(Money::from_minor(99_999_999)).is_ok());
        assert!(matches!(
            ServiceCatalog::validate_price(Money::ZERO),
            Err(HotelError::InvalidAmount(_))
        ));
        assert!(ServiceCatalog::validate_price(Money::from_minor(100_000_000)).is_err());
    }

    #[test]
    fn test_prepare_new() {
        let now = Utc::now();
        let item =
            ServiceCatalog::prepare_new(&MarkupSanitizer, " Breakfast ", Money::from_minor(1_250), now)
                .unwrap();
        assert_eq!(item.name, "Breakfast");
        assert_eq!(item.unit_price, Money::from_minor(1_250));
        assert_eq!(item.created_at, now);
    }

    #[test]
    fn test_apply_update_only_touches_given_fields() {
        let created = Utc::now();
        let item =
            ServiceCatalog::prepare_new(&MarkupSanitizer, "Parking", Money::from_minor(900), created)
                .unwrap();
        let later = created + chrono::Duration::hours(1);

        let repriced = ServiceCatalog::apply_update(
            &MarkupSanitizer,
            &item,
            None,
            Some(Money::from_minor(1_100)),
            later,
        )
        .unwrap();
        assert_eq!(repriced.name, "Parking");
        assert_eq!(repriced.unit_price, Money::from_minor(1_100));
        assert_eq!(repriced.updated_at, later);

        let unchanged =
            ServiceCatalog::apply_update(&MarkupSanitizer, &item, None, None, later).unwrap();
        assert_eq!(unchanged.updated_at, created);
    }
}
