//! Response DTOs for the calculation API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::dispatch::{Operation, Resolution};

/// Response body of the arithmetic endpoints
#[derive(Debug, Clone, Serialize)]
pub struct CalcResponse {
    /// Operation performed (`add`, `subtract`, `multiply`, `divide`)
    pub action: &'static str,
    /// Left operand
    pub x: i64,
    /// Right operand
    pub y: i64,
    /// Result of the operation
    pub answer: i64,
    /// Whether the answer was served from the cache
    pub cached: bool,
}

impl CalcResponse {
    /// Creates a new CalcResponse
    pub fn new(op: Operation, x: i64, y: i64, resolution: Resolution) -> Self {
        Self {
            action: op.action(),
            x,
            y,
            answer: resolution.answer,
            cached: resolution.cached,
        }
    }
}

/// Response body for the health endpoint (GET /health)
///
/// `hit` and `size` are only reported while the cache answers pings.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "OK" or the cache error message
    pub cache: String,
    /// Number of cache hits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit: Option<u64>,
    /// Number of cached results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a HealthResponse for a reachable cache
    pub fn healthy(hit: u64, size: usize) -> Self {
        Self {
            cache: "OK".to_string(),
            hit: Some(hit),
            size: Some(size),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Creates a HealthResponse carrying the cache error
    pub fn unreachable(error: impl Into<String>) -> Self {
        Self {
            cache: error.into(),
            hit: None,
            size: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for rejected requests
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub err: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(err: impl Into<String>) -> Self {
        Self { err: err.into() }
    }
}
