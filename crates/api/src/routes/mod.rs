//! API route definitions.

use axum::{Router, middleware};
use innkeep_core::store::Store;

use crate::{AppState, middleware::auth_middleware};

pub mod customers;
pub mod health;
pub mod payments;
pub mod reservations;
pub mod rooms;
pub mod services;

#[cfg(test)]
mod tests;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state<S: Store + 'static>(state: AppState<S>) -> Router<AppState<S>> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(services::routes())
        .merge(rooms::routes())
        .merge(customers::routes())
        .merge(reservations::routes())
        .merge(payments::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<S>,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}
