//! Recording and voiding payments.

use innkeep_shared::types::{PaymentId, ReservationId};

use super::types::RecordPaymentInput;
use super::{ReconciliationFacade, load_folio, refresh_folio};
use crate::authz::{Action, Actor, ResourceKind};
use crate::error::HotelError;
use crate::ledger::{PaymentLedger, PaymentRequest, ReservationFolio};
use crate::model::Payment;
use crate::sanitize::Sanitizer;
use crate::store::{Store, StoreError, StoreTx, constraints};

/// Longest transaction reference kept.
pub const MAX_TRANSACTION_REF_CHARS: usize = 100;
/// Longest payment comment kept.
pub const MAX_COMMENT_CHARS: usize = 500;

fn clean_text(sanitizer: &dyn Sanitizer, raw: Option<&str>, max_chars: usize) -> Option<String> {
    raw.map(|text| sanitizer.sanitize(text, max_chars))
        .filter(|text| !text.is_empty())
}

impl<S: Store> ReconciliationFacade<S> {
    /// Records a payment or refund and returns the refreshed folio.
    ///
    /// The overpayment check runs against the locked reservation, so two
    /// concurrent payments cannot both fit into the same remaining due.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`, `FuturePayment`
    /// - `ReservationNotFound`
    /// - `ExceedsRemaining`, `RefundExceedsPaid`
    pub async fn record_payment(
        &self,
        actor: &Actor,
        reservation_id: ReservationId,
        input: RecordPaymentInput,
    ) -> Result<ReservationFolio, HotelError> {
        self.run("record_payment", async {
            self.authorize(actor, Action::Create, ResourceKind::Payment)?;
            let now = self.now();
            let request = PaymentRequest {
                amount: input.amount,
                method: input.method,
                payment_type: input.payment_type,
                paid_at: input.paid_at.unwrap_or(now),
            };

            let mut tx = self.store.begin().await?;
            let reservation = tx
                .lock_reservation(reservation_id)
                .await?
                .ok_or(HotelError::ReservationNotFound(reservation_id))?;
            let before = load_folio(&mut tx, reservation).await?;
            PaymentLedger::validate(&request, before.total, &before.payments, now)?;

            let payment = Payment {
                id: PaymentId::new(),
                reservation_id,
                amount: request.amount,
                method: request.method,
                payment_type: request.payment_type,
                paid_at: request.paid_at,
                transaction_ref: clean_text(
                    self.sanitizer.as_ref(),
                    input.transaction_ref.as_deref(),
                    MAX_TRANSACTION_REF_CHARS,
                ),
                comment: clean_text(
                    self.sanitizer.as_ref(),
                    input.comment.as_deref(),
                    MAX_COMMENT_CHARS,
                ),
                recorded_by: actor.id,
                created_at: now,
            };
            tx.insert_payment(&payment)
                .await
                .map_err(|e| missing_reservation(e, reservation_id))?;
            let folio = refresh_folio(&mut tx, before.reservation, now).await?;
            tx.commit().await?;

            self.audit(
                actor,
                "record_payment",
                ResourceKind::Payment,
                payment.id,
                format!(
                    "{} {} {} on {reservation_id}, remaining {}",
                    payment.payment_type.as_str(),
                    payment.method.as_str(),
                    payment.amount,
                    folio.amount_remaining
                ),
            );
            Ok(folio)
        })
        .await
    }

    /// Removes a payment entered in error and returns the refreshed folio.
    ///
    /// # Errors
    ///
    /// - `PaymentNotFound`
    /// - `ReservationNotFound` if the owning reservation vanished
    pub async fn delete_payment(
        &self,
        actor: &Actor,
        payment_id: PaymentId,
    ) -> Result<ReservationFolio, HotelError> {
        self.run("delete_payment", async {
            self.authorize(actor, Action::Delete, ResourceKind::Payment)?;

            let mut tx = self.store.begin().await?;
            let payment = tx
                .find_payment(payment_id)
                .await?
                .ok_or(HotelError::PaymentNotFound(payment_id))?;
            let reservation = tx
                .lock_reservation(payment.reservation_id)
                .await?
                .ok_or(HotelError::ReservationNotFound(payment.reservation_id))?;

            tx.delete_payment(payment_id).await?;
            let folio = refresh_folio(&mut tx, reservation, self.now()).await?;
            tx.commit().await?;

            self.audit(
                actor,
                "delete_payment",
                ResourceKind::Payment,
                payment_id,
                format!(
                    "{} {} removed from {}",
                    payment.payment_type.as_str(),
                    payment.amount,
                    payment.reservation_id
                ),
            );
            Ok(folio)
        })
        .await
    }

    /// Lists the payments of a reservation in recording order.
    ///
    /// # Errors
    ///
    /// Returns `ReservationNotFound`.
    pub async fn list_payments(
        &self,
        actor: &Actor,
        reservation_id: ReservationId,
    ) -> Result<Vec<Payment>, HotelError> {
        self.run("list_payments", async {
            self.authorize(actor, Action::View, ResourceKind::Payment)?;

            let mut tx = self.store.begin().await?;
            tx.find_reservation(reservation_id)
                .await?
                .ok_or(HotelError::ReservationNotFound(reservation_id))?;
            Ok(tx.payments(reservation_id).await?)
        })
        .await
    }
}

fn missing_reservation(err: StoreError, reservation_id: ReservationId) -> HotelError {
    if err.violates(constraints::PAYMENT_RESERVATION_FK) {
        HotelError::ReservationNotFound(reservation_id)
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::MarkupSanitizer;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text(&MarkupSanitizer, None, 10), None);
        assert_eq!(clean_text(&MarkupSanitizer, Some("  <i></i> "), 10), None);
        assert_eq!(
            clean_text(&MarkupSanitizer, Some(" <b>TX-42</b> "), 10).as_deref(),
            Some("TX-42")
        );
    }
}
