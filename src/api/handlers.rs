//! API Handlers
//!
//! HTTP request handlers for each calculation server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::debug;

use crate::cache::CacheBackend;
use crate::dispatch::{Operation, Resolver};
use crate::error::ValidationError;
use crate::models::{CalcResponse, HealthResponse, OperandsQuery};

/// Application state shared across all handlers.
///
/// Holds the single cache backend of the process, injected at startup.
#[derive(Clone)]
pub struct AppState {
    /// Lookup-or-compute layer over the cache
    pub resolver: Resolver,
}

impl AppState {
    /// Creates a new AppState around the given cache backend.
    pub fn new(cache: Arc<dyn CacheBackend>) -> Self {
        Self {
            resolver: Resolver::new(cache),
        }
    }

    /// The shared cache backend.
    pub fn cache(&self) -> &Arc<dyn CacheBackend> {
        self.resolver.cache()
    }
}

/// Validates the operands and serves the result through the cache.
///
/// The query arrives as raw pairs so repeated keys never reject the request.
async fn calculate(
    state: &AppState,
    op: Operation,
    pairs: Vec<(String, String)>,
) -> Result<Json<CalcResponse>, ValidationError> {
    let (x, y) = OperandsQuery::from_pairs(pairs).validate(op)?;
    debug!(action = op.action(), x, y, "Received operands");

    let resolution = state.resolver.resolve_op(op, x, y).await;
    Ok(Json(CalcResponse::new(op, x, y, resolution)))
}

/// Handler for GET /add
pub async fn add_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<CalcResponse>, ValidationError> {
    calculate(&state, Operation::Add, pairs).await
}

/// Handler for GET /subtract
pub async fn subtract_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<CalcResponse>, ValidationError> {
    calculate(&state, Operation::Subtract, pairs).await
}

/// Handler for GET /multiply
pub async fn multiply_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<CalcResponse>, ValidationError> {
    calculate(&state, Operation::Multiply, pairs).await
}

/// Handler for GET /divide
///
/// Integer division truncating toward zero: `1 / 3 = 0`, `4 / 3 = 1`.
pub async fn divide_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<CalcResponse>, ValidationError> {
    calculate(&state, Operation::Divide, pairs).await
}

/// Handler for GET /health
///
/// Always answers 200; a failing cache is reported in the body.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = state.cache();

    if let Err(e) = cache.ping().await {
        return Json(HealthResponse::unreachable(e.to_string()));
    }

    Json(HealthResponse::healthy(
        cache.counter().await,
        cache.size().await,
    ))
}
