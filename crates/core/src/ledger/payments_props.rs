//! Property-based tests for PaymentLedger.
//!
//! - Remaining is never negative for any payment sequence.
//! - Status boundary: complete iff remaining is zero, unpaid iff paid is zero.
//! - Validated payments never push the amount paid past the total.

use chrono::Utc;
use innkeep_shared::types::{Money, PaymentId, ReservationId, UserId};
use proptest::prelude::*;

use super::payments::{PaymentLedger, PaymentRequest};
use crate::model::{Payment, PaymentMethod, PaymentStatus, PaymentType};

fn payment_type() -> impl Strategy<Value = PaymentType> {
    prop_oneof![
        Just(PaymentType::Deposit),
        Just(PaymentType::Balance),
        Just(PaymentType::Refund),
        Just(PaymentType::Fee),
    ]
}

fn payment(cents: i64, payment_type: PaymentType) -> Payment {
    let now = Utc::now();
    Payment {
        id: PaymentId::new(),
        reservation_id: ReservationId::new(),
        amount: Money::from_minor(cents),
        method: PaymentMethod::Transfer,
        payment_type,
        paid_at: now,
        transaction_ref: None,
        comment: None,
        recorded_by: UserId::new(),
        created_at: now,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Property: remaining is never negative, whatever was recorded.
    #[test]
    fn prop_remaining_never_negative(
        total in 1i64..10_000_000_000i64,
        entries in prop::collection::vec((1i64..100_000_000i64, payment_type()), 0..20),
    ) {
        let payments: Vec<_> = entries.iter().map(|(c, t)| payment(*c, *t)).collect();
        let paid = PaymentLedger::amount_paid(&payments);
        let remaining = PaymentLedger::amount_remaining(Money::from_minor(total), paid);
        prop_assert!(!paid.is_negative());
        prop_assert!(!remaining.is_negative());
        prop_assert!(remaining <= Money::from_minor(total));
    }

    /// Property: status agrees with paid and remaining.
    #[test]
    fn prop_status_boundaries(
        total in 1i64..10_000_000_000i64,
        paid in 0i64..20_000_000_000i64,
    ) {
        let total = Money::from_minor(total);
        let paid = Money::from_minor(paid);
        let status = PaymentLedger::status(total, paid);
        let remaining = PaymentLedger::amount_remaining(total, paid);

        prop_assert_eq!(status == PaymentStatus::Unpaid, paid.is_zero());
        if !paid.is_zero() {
            prop_assert_eq!(status == PaymentStatus::Complete, remaining.is_zero());
        }
    }

    /// Property: applying only validated payments keeps paid <= total and
    /// never refunds more than was paid.
    #[test]
    fn prop_validated_sequence_stays_within_total(
        total in 1i64..100_000_000i64,
        attempts in prop::collection::vec((1i64..100_000_000i64, payment_type()), 0..30),
    ) {
        let total = Money::from_minor(total);
        let mut payments = Vec::new();
        for (cents, payment_type) in attempts {
            let request = PaymentRequest {
                amount: Money::from_minor(cents),
                method: PaymentMethod::Card,
                payment_type,
                paid_at: Utc::now(),
            };
            if PaymentLedger::validate(&request, total, &payments, Utc::now()).is_ok() {
                payments.push(payment(cents, payment_type));
            }
            let net: i64 = payments.iter().map(|p| p.signed_amount().minor_units()).sum();
            prop_assert!(net >= 0);
            prop_assert!(PaymentLedger::amount_paid(&payments) <= total);
        }
    }
}
