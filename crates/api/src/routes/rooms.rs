//! Room registry routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use innkeep_core::model::RoomState;
use innkeep_core::registry::NewRoom;
use innkeep_core::store::Store;
use innkeep_shared::types::RoomId;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::map_hotel_error, middleware::AuthUser};

/// Creates the room routes (requires auth middleware to be applied externally).
pub fn routes<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/rooms", post(create_room::<S>))
        .route("/rooms/{id}", get(get_room::<S>).delete(delete_room::<S>))
        .route("/rooms/{id}/state", put(set_room_state::<S>))
}

/// Request body for a room state change.
#[derive(Debug, Deserialize)]
pub struct SetRoomStateRequest {
    /// `available`, `occupied`, `maintenance` or `out_of_service`.
    pub state: RoomState,
}

/// POST `/rooms` - Register a room.
async fn create_room<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Json(payload): Json<NewRoom>,
) -> impl IntoResponse {
    match state.facade.create_room(auth.actor(), payload).await {
        Ok(room) => {
            info!(room_id = %room.id, number = %room.number, "Room created");
            (StatusCode::CREATED, Json(room)).into_response()
        }
        Err(e) => map_hotel_error(e),
    }
}

/// GET `/rooms/{id}` - Fetch an active room.
async fn get_room<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.facade.get_room(auth.actor(), RoomId::from_uuid(id)).await {
        Ok(room) => (StatusCode::OK, Json(room)).into_response(),
        Err(e) => map_hotel_error(e),
    }
}

/// PUT `/rooms/{id}/state` - Change the housekeeping state.
async fn set_room_state<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetRoomStateRequest>,
) -> impl IntoResponse {
    match state
        .facade
        .set_room_state(auth.actor(), RoomId::from_uuid(id), payload.state)
        .await
    {
        Ok(room) => {
            info!(room_id = %room.id, state = %room.state, "Room state changed");
            (StatusCode::OK, Json(room)).into_response()
        }
        Err(e) => map_hotel_error(e),
    }
}

/// DELETE `/rooms/{id}` - Archive a room without current or upcoming stays.
async fn delete_room<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.facade.delete_room(auth.actor(), RoomId::from_uuid(id)).await {
        Ok(()) => {
            info!(room_id = %id, "Room archived");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => map_hotel_error(e),
    }
}
