//! Payment ledger: append-only payments and refunds of one reservation.

use chrono::{DateTime, Utc};
use innkeep_shared::types::{Money, MoneyBounds};

use crate::error::HotelError;
use crate::model::{Payment, PaymentMethod, PaymentStatus, PaymentType};

/// A payment about to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Positive amount.
    pub amount: Money,
    /// How the money moved.
    pub method: PaymentMethod,
    /// Purpose.
    pub payment_type: PaymentType,
    /// When the money moved.
    pub paid_at: DateTime<Utc>,
}

/// Settlement-side ledger of one reservation.
pub struct PaymentLedger;

impl PaymentLedger {
    /// Sum of payments with refunds subtracted, floored at zero.
    #[must_use]
    pub fn amount_paid(payments: &[Payment]) -> Money {
        let net: Money = payments.iter().map(Payment::signed_amount).sum();
        if net.is_negative() { Money::ZERO } else { net }
    }

    /// `max(0, total - paid)`, with a difference inside the settlement
    /// tolerance reported as zero.
    #[must_use]
    pub fn amount_remaining(total: Money, paid: Money) -> Money {
        let due = total.clamped_sub(paid);
        if due < Money::SETTLEMENT_TOLERANCE {
            Money::ZERO
        } else {
            due
        }
    }

    /// Derived payment status.
    ///
    /// Nothing paid is always `Unpaid`, even for a zero total.
    #[must_use]
    pub fn status(total: Money, paid: Money) -> PaymentStatus {
        if paid.is_zero() {
            PaymentStatus::Unpaid
        } else if Self::amount_remaining(total, paid).is_zero() {
            PaymentStatus::Complete
        } else {
            PaymentStatus::Partial
        }
    }

    /// Checks a payment against the current ledger.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` outside `[0.01, 999,999.99]`
    /// - `FuturePayment` when `paid_at` is after `now`
    /// - `ExceedsRemaining` when a non-refund overshoots the remaining due
    ///   by the settlement tolerance or more
    /// - `RefundExceedsPaid` when a refund is larger than the amount paid
    pub fn validate(
        request: &PaymentRequest,
        total: Money,
        payments: &[Payment],
        now: DateTime<Utc>,
    ) -> Result<(), HotelError> {
        MoneyBounds::PAYMENT.check(request.amount)?;
        if request.paid_at > now {
            return Err(HotelError::FuturePayment);
        }

        let paid = Self::amount_paid(payments);
        if request.payment_type.is_refund() {
            if request.amount > paid {
                return Err(HotelError::RefundExceedsPaid {
                    amount: request.amount,
                    paid,
                });
            }
        } else {
            let remaining = Self::amount_remaining(total, paid);
            if request.amount.clamped_sub(remaining) >= Money::SETTLEMENT_TOLERANCE {
                return Err(HotelError::ExceedsRemaining {
                    amount: request.amount,
                    remaining,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use innkeep_shared::types::{PaymentId, ReservationId, UserId};

    use super::*;

    fn payment(cents: i64, payment_type: PaymentType) -> Payment {
        let now = Utc::now();
        Payment {
            id: PaymentId::new(),
            reservation_id: ReservationId::new(),
            amount: Money::from_minor(cents),
            method: PaymentMethod::Card,
            payment_type,
            paid_at: now,
            transaction_ref: None,
            comment: None,
            recorded_by: UserId::new(),
            created_at: now,
        }
    }

    fn request(cents: i64, payment_type: PaymentType) -> PaymentRequest {
        PaymentRequest {
            amount: Money::from_minor(cents),
            method: PaymentMethod::Cash,
            payment_type,
            paid_at: Utc::now(),
        }
    }

    #[test]
    fn test_amount_paid_subtracts_refunds() {
        let payments = vec![
            payment(10_000, PaymentType::Deposit),
            payment(5_100, PaymentType::Balance),
            payment(2_000, PaymentType::Refund),
        ];
        assert_eq!(PaymentLedger::amount_paid(&payments), Money::from_minor(13_100));
    }

    #[test]
    fn test_amount_paid_floored_at_zero() {
        let payments = vec![payment(500, PaymentType::Refund)];
        assert_eq!(PaymentLedger::amount_paid(&payments), Money::ZERO);
    }

    #[test]
    fn test_remaining_never_negative() {
        let total = Money::from_minor(10_000);
        assert_eq!(
            PaymentLedger::amount_remaining(total, Money::from_minor(15_100)),
            Money::ZERO
        );
        assert_eq!(
            PaymentLedger::amount_remaining(total, Money::from_minor(4_000)),
            Money::from_minor(6_000)
        );
    }

    #[test]
    fn test_status_boundaries() {
        let total = Money::from_minor(15_100);
        assert_eq!(PaymentLedger::status(total, Money::ZERO), PaymentStatus::Unpaid);
        assert_eq!(
            PaymentLedger::status(total, Money::from_minor(15_099)),
            PaymentStatus::Partial
        );
        assert_eq!(PaymentLedger::status(total, total), PaymentStatus::Complete);
        assert_eq!(
            PaymentLedger::status(total, Money::from_minor(20_000)),
            PaymentStatus::Complete
        );
    }

    #[test]
    fn test_payment_above_remaining_rejected() {
        let total = Money::from_minor(15_100);
        let err = PaymentLedger::validate(
            &request(15_102, PaymentType::Balance),
            total,
            &[],
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, HotelError::ExceedsRemaining { .. }));

        assert!(
            PaymentLedger::validate(&request(15_101, PaymentType::Fee), total, &[], Utc::now())
                .is_err()
        );
        assert!(
            PaymentLedger::validate(&request(15_100, PaymentType::Balance), total, &[], Utc::now())
                .is_ok()
        );
    }

    #[test]
    fn test_deposit_on_settled_reservation_rejected() {
        let total = Money::from_minor(10_000);
        let payments = vec![payment(10_000, PaymentType::Balance)];
        assert!(matches!(
            PaymentLedger::validate(&request(1, PaymentType::Deposit), total, &payments, Utc::now()),
            Err(HotelError::ExceedsRemaining { .. })
        ));
    }

    #[test]
    fn test_refund_limited_to_amount_paid() {
        let total = Money::from_minor(10_000);
        let payments = vec![payment(15_100, PaymentType::Balance)];
        assert!(
            PaymentLedger::validate(&request(15_100, PaymentType::Refund), total, &payments, Utc::now())
                .is_ok()
        );
        assert!(matches!(
            PaymentLedger::validate(&request(15_101, PaymentType::Refund), total, &payments, Utc::now()),
            Err(HotelError::RefundExceedsPaid { .. })
        ));
    }

    #[test]
    fn test_amount_bounds_and_dates() {
        let total = Money::from_minor(10_000);
        assert!(matches!(
            PaymentLedger::validate(&request(0, PaymentType::Balance), total, &[], Utc::now()),
            Err(HotelError::InvalidAmount(_))
        ));

        let now = Utc::now();
        let mut future = request(1_000, PaymentType::Balance);
        future.paid_at = now + chrono::Duration::minutes(5);
        assert!(matches!(
            PaymentLedger::validate(&future, total, &[], now),
            Err(HotelError::FuturePayment)
        ));
    }
}
