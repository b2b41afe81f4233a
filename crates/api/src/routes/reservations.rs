//! Reservation and service line routes.
//!
//! Every write answers with the refreshed folio: the reservation, its lines
//! and payments, and the derived total, amount paid and amount remaining.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use innkeep_core::facade::{CreateReservationInput, UpdateReservationInput};
use innkeep_core::store::Store;
use innkeep_shared::types::{ReservationId, ServiceItemId, ServiceLineId};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::map_hotel_error, middleware::AuthUser};

/// Creates the reservation routes (requires auth middleware to be applied externally).
pub fn routes<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/reservations", post(create_reservation::<S>))
        .route(
            "/reservations/{id}",
            get(get_reservation::<S>)
                .patch(update_reservation::<S>)
                .delete(delete_reservation::<S>),
        )
        .route("/reservations/{id}/services", post(attach_service::<S>))
        .route(
            "/reservations/{id}/services/{line_id}",
            patch(update_service_quantity::<S>).delete(detach_service::<S>),
        )
}

/// Request body for attaching a catalog service.
#[derive(Debug, Deserialize)]
pub struct AttachServiceRequest {
    /// Catalog service to attach.
    pub service_id: Uuid,
    /// Quantity, 1 when absent.
    #[serde(default)]
    pub quantity: Option<i64>,
}

/// Request body for changing a line's quantity.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    /// New quantity, 1 to 9999.
    pub quantity: i64,
}

/// POST `/reservations` - Book a room.
async fn create_reservation<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Json(payload): Json<CreateReservationInput>,
) -> impl IntoResponse {
    match state.facade.create_reservation(auth.actor(), payload).await {
        Ok(folio) => {
            info!(
                reservation_id = %folio.reservation.id,
                room_id = %folio.reservation.room_id,
                dates = %folio.reservation.dates,
                "Reservation created"
            );
            (StatusCode::CREATED, Json(folio)).into_response()
        }
        Err(e) => map_hotel_error(e),
    }
}

/// GET `/reservations/{id}` - Fetch the folio.
async fn get_reservation<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .facade
        .reservation_folio(auth.actor(), ReservationId::from_uuid(id))
        .await
    {
        Ok(folio) => (StatusCode::OK, Json(folio)).into_response(),
        Err(e) => map_hotel_error(e),
    }
}

/// PATCH `/reservations/{id}` - Move, reprice or change the status of a stay.
async fn update_reservation<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReservationInput>,
) -> impl IntoResponse {
    match state
        .facade
        .update_reservation(auth.actor(), ReservationId::from_uuid(id), payload)
        .await
    {
        Ok(folio) => {
            info!(
                reservation_id = %id,
                status = %folio.reservation.status,
                "Reservation updated"
            );
            (StatusCode::OK, Json(folio)).into_response()
        }
        Err(e) => map_hotel_error(e),
    }
}

/// DELETE `/reservations/{id}` - Delete a reservation without payments.
async fn delete_reservation<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .facade
        .delete_reservation(auth.actor(), ReservationId::from_uuid(id))
        .await
    {
        Ok(()) => {
            info!(reservation_id = %id, "Reservation deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => map_hotel_error(e),
    }
}

/// POST `/reservations/{id}/services` - Attach a catalog service.
async fn attach_service<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttachServiceRequest>,
) -> impl IntoResponse {
    match state
        .facade
        .attach_service(
            auth.actor(),
            ReservationId::from_uuid(id),
            ServiceItemId::from_uuid(payload.service_id),
            payload.quantity,
        )
        .await
    {
        Ok(folio) => {
            info!(
                reservation_id = %id,
                service_id = %payload.service_id,
                total = %folio.total,
                "Service attached"
            );
            (StatusCode::CREATED, Json(folio)).into_response()
        }
        Err(e) => map_hotel_error(e),
    }
}

/// PATCH `/reservations/{id}/services/{line_id}` - Change a line's quantity.
async fn update_service_quantity<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path((id, line_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> impl IntoResponse {
    match state
        .facade
        .update_service_quantity(
            auth.actor(),
            ReservationId::from_uuid(id),
            ServiceLineId::from_uuid(line_id),
            payload.quantity,
        )
        .await
    {
        Ok(folio) => {
            info!(reservation_id = %id, line_id = %line_id, "Service quantity updated");
            (StatusCode::OK, Json(folio)).into_response()
        }
        Err(e) => map_hotel_error(e),
    }
}

/// DELETE `/reservations/{id}/services/{line_id}` - Detach a service line.
async fn detach_service<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path((id, line_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    match state
        .facade
        .detach_service(
            auth.actor(),
            ReservationId::from_uuid(id),
            ServiceLineId::from_uuid(line_id),
        )
        .await
    {
        Ok(folio) => {
            info!(reservation_id = %id, line_id = %line_id, "Service detached");
            (StatusCode::OK, Json(folio)).into_response()
        }
        Err(e) => map_hotel_error(e),
    }
}
