//! API Routes
//!
//! Configures the Axum router with all calculation server endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_handler, divide_handler, health_handler, multiply_handler, subtract_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// Every endpoint is GET-only; other methods on a known path get 405.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/add", get(add_handler))
        .route("/subtract", get(subtract_handler))
        .route("/multiply", get(multiply_handler))
        .route("/divide", get(divide_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
