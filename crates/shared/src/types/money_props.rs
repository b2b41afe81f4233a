//! Property-based tests for Money rounding.
//!
//! - Canonical text survives repeated parse/format round-trips
//! - Rounding is idempotent

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::money::Money;

/// Decimals with up to 6 fraction digits, within +/- 10 million.
fn arbitrary_decimal() -> impl Strategy<Value = Decimal> {
    (-10_000_000_000_000i64..10_000_000_000_000i64, 0u32..=6)
        .prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// round(round(x)) == round(x)
    #[test]
    fn prop_rounding_is_idempotent(value in arbitrary_decimal()) {
        let once = Money::from_decimal(value).unwrap();
        let twice = Money::from_decimal(once.to_decimal()).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Canonical text parses back to the same amount and formats identically.
    #[test]
    fn prop_canonical_text_is_stable(value in arbitrary_decimal()) {
        let first = Money::from_decimal_str(&value.to_string()).unwrap();
        let text = first.to_decimal_string();
        let second = Money::from_decimal_str(&text).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(text, second.to_decimal_string());
    }

    /// Formatting always yields exactly two fraction digits.
    #[test]
    fn prop_two_fraction_digits(minor in any::<i64>()) {
        let text = Money::from_minor(minor).to_decimal_string();
        let fraction = text.rsplit('.').next().unwrap();
        prop_assert_eq!(fraction.len(), 2);
    }

    /// Rounding never moves an amount by more than half a cent.
    #[test]
    fn prop_rounding_error_is_bounded(value in arbitrary_decimal()) {
        let rounded = Money::from_decimal(value).unwrap().to_decimal();
        prop_assert!((rounded - value).abs() <= Decimal::new(5, 3));
    }
}
