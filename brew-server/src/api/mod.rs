//! API routes
//!
//! - [`health`] - liveness and database check
//! - [`inventory`] - ingredient stock management
//! - [`menu`] - menu items and recipes
//! - [`orders`] - placement, batch placement and order lifecycle

pub mod health;
pub mod inventory;
pub mod menu;
pub mod orders;


use axum::Router;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppError, AppResult};

/// Every route, without middleware or state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(inventory::router())
        .merge(menu::router())
        .merge(orders::router())
}

/// Routes plus tower middleware. Used by the server and by handler tests.
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);
    build_router().layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(TimeoutLayer::with_status_code(
                http::StatusCode::REQUEST_TIMEOUT,
                timeout,
            )),
    )
}
