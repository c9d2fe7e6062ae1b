//! Error types for the calculation cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Failures reported by a cache backend.
///
/// A cache miss is never an error. Only connectivity problems and use of a
/// closed backend end up here.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backend could not be reached or configured
    #[error("Connection error: {0}")]
    Connection(String),

    /// Backend has already been closed
    #[error("Cache backend is closed")]
    Closed,

    /// Error returned by the Redis server or client
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Internal backend error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Validation Error Enum ==
/// Rejections produced while validating calculation query parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `x` query parameter missing or empty
    #[error("x is not provided")]
    MissingX,

    /// `y` query parameter missing or empty
    #[error("y is not provided")]
    MissingY,

    /// An operand is not a valid integer
    #[error("Unsupported data type. Integer only")]
    NotAnInteger,

    /// Division with a zero divisor
    #[error("Divide by zero")]
    DivideByZero,
}

// == IntoResponse Implementation ==
impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.to_string()));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache backend operations.
pub type Result<T> = std::result::Result<T, CacheError>;
