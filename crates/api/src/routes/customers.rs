//! Customer registry routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use innkeep_core::registry::NewCustomer;
use innkeep_core::store::Store;
use innkeep_shared::types::CustomerId;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::map_hotel_error, middleware::AuthUser};

/// Creates the customer routes (requires auth middleware to be applied externally).
pub fn routes<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/customers", post(create_customer::<S>))
        .route(
            "/customers/{id}",
            get(get_customer::<S>).delete(delete_customer::<S>),
        )
}

/// POST `/customers` - Register a guest.
async fn create_customer<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Json(payload): Json<NewCustomer>,
) -> impl IntoResponse {
    match state.facade.create_customer(auth.actor(), payload).await {
        Ok(customer) => {
            info!(customer_id = %customer.id, "Customer created");
            (StatusCode::CREATED, Json(customer)).into_response()
        }
        Err(e) => map_hotel_error(e),
    }
}

/// GET `/customers/{id}` - Fetch an active customer.
async fn get_customer<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .facade
        .get_customer(auth.actor(), CustomerId::from_uuid(id))
        .await
    {
        Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
        Err(e) => map_hotel_error(e),
    }
}

/// DELETE `/customers/{id}` - Archive a customer without current or upcoming stays.
async fn delete_customer<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .facade
        .delete_customer(auth.actor(), CustomerId::from_uuid(id))
        .await
    {
        Ok(()) => {
            info!(customer_id = %id, "Customer archived");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => map_hotel_error(e),
    }
}
