//! Request and Response models for the calculation API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! deserializing query strings and serializing HTTP response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::OperandsQuery;
pub use responses::{CalcResponse, ErrorResponse, HealthResponse};
