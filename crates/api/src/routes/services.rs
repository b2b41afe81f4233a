//! Service catalog routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use innkeep_core::facade::UpdateServiceInput;
use innkeep_core::store::Store;
use innkeep_shared::types::{Money, ServiceItemId};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::map_hotel_error, middleware::AuthUser};

/// Creates the catalog routes (requires auth middleware to be applied externally).
pub fn routes<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/services", get(list_services::<S>).post(create_service::<S>))
        .route(
            "/services/{id}",
            get(get_service::<S>)
                .patch(update_service::<S>)
                .delete(delete_service::<S>),
        )
}

/// Request body for a new catalog service.
#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    /// Display name, unique ignoring case.
    pub name: String,
    /// Unit price as a decimal string.
    pub unit_price: Money,
}

/// GET `/services` - List the catalog, ordered by name.
async fn list_services<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
) -> impl IntoResponse {
    match state.facade.list_services(auth.actor()).await {
        Ok(services) => (StatusCode::OK, Json(json!({ "services": services }))).into_response(),
        Err(e) => map_hotel_error(e),
    }
}

/// POST `/services` - Add a service to the catalog.
async fn create_service<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Json(payload): Json<CreateServiceRequest>,
) -> impl IntoResponse {
    match state
        .facade
        .create_service(auth.actor(), &payload.name, payload.unit_price)
        .await
    {
        Ok(item) => {
            info!(service_id = %item.id, name = %item.name, "Service created");
            (StatusCode::CREATED, Json(item)).into_response()
        }
        Err(e) => map_hotel_error(e),
    }
}

/// GET `/services/{id}` - Fetch one catalog service.
async fn get_service<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .facade
        .get_service(auth.actor(), ServiceItemId::from_uuid(id))
        .await
    {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => map_hotel_error(e),
    }
}

/// PATCH `/services/{id}` - Rename and/or reprice a service.
///
/// Lines already attached to reservations keep their frozen price.
async fn update_service<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateServiceInput>,
) -> impl IntoResponse {
    match state
        .facade
        .update_service(auth.actor(), ServiceItemId::from_uuid(id), payload)
        .await
    {
        Ok(item) => {
            info!(service_id = %item.id, "Service updated");
            (StatusCode::OK, Json(item)).into_response()
        }
        Err(e) => map_hotel_error(e),
    }
}

/// DELETE `/services/{id}` - Remove a service no reservation references.
async fn delete_service<S: Store + 'static>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .facade
        .delete_service(auth.actor(), ServiceItemId::from_uuid(id))
        .await
    {
        Ok(()) => {
            info!(service_id = %id, "Service deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => map_hotel_error(e),
    }
}
