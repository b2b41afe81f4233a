//! Payment ledger routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use innkeep_core::facade::RecordPaymentInput;
use innkeep_core::store::Store;
use innkeep_shared::types::{PaymentId, ReservationId};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::map_hotel_error, middleware::AuthUser};

/// Creates the payment routes (requires auth middleware to be applied externally).
pub fn routes<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/reservations/{id}/payments",
            get(list_payments::<S>).post(record_payment::<S>),
        )
        .route("/payments/{id}", delete(delete_payment::<S>))
}

/// GET `/reservations/{id}/payments` - List payments in recording order.
async fn list_payments<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .facade
        .list_payments(auth.actor(), ReservationId::from_uuid(id))
        .await
    {
        Ok(payments) => (StatusCode::OK, Json(json!({ "payments": payments }))).into_response(),
        Err(e) => map_hotel_error(e),
    }
}

/// POST `/reservations/{id}/payments` - Record a payment or refund.
async fn record_payment<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordPaymentInput>,
) -> impl IntoResponse {
    let amount = payload.amount;
    let payment_type = payload.payment_type;
    match state
        .facade
        .record_payment(auth.actor(), ReservationId::from_uuid(id), payload)
        .await
    {
        Ok(folio) => {
            info!(
                reservation_id = %id,
                amount = %amount,
                payment_type = payment_type.as_str(),
                remaining = %folio.amount_remaining,
                "Payment recorded"
            );
            (StatusCode::CREATED, Json(folio)).into_response()
        }
        Err(e) => map_hotel_error(e),
    }
}

/// DELETE `/payments/{id}` - Remove a payment and answer with the owning folio.
async fn delete_payment<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .facade
        .delete_payment(auth.actor(), PaymentId::from_uuid(id))
        .await
    {
        Ok(folio) => {
            info!(payment_id = %id, reservation_id = %folio.reservation.id, "Payment deleted");
            (StatusCode::OK, Json(folio)).into_response()
        }
        Err(e) => map_hotel_error(e),
    }
}
