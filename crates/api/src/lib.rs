//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST routes over the reconciliation facade
//! - Bearer token authentication middleware
//! - Mapping of core errors to HTTP responses

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use innkeep_core::ReconciliationFacade;
use innkeep_core::store::Store;
use innkeep_db::PgStore;
use innkeep_shared::JwtService;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
pub struct AppState<S: Store> {
    /// Reservation core over the configured store.
    pub facade: Arc<ReconciliationFacade<S>>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
}

impl<S: Store> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            facade: Arc::clone(&self.facade),
            jwt_service: Arc::clone(&self.jwt_service),
        }
    }
}

/// State of the production server.
pub type PgAppState = AppState<PgStore>;

/// Creates the main application router.
pub fn create_router<S: Store + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
