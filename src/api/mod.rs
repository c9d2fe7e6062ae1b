//! API Module
//!
//! HTTP handlers and routing for the calculation server REST API.
//!
//! # Endpoints
//! - `GET /add?x=&y=` - Sum of x and y
//! - `GET /subtract?x=&y=` - Difference x - y
//! - `GET /multiply?x=&y=` - Product of x and y
//! - `GET /divide?x=&y=` - Quotient x / y, truncated toward zero
//! - `GET /health` - Cache status and statistics

pub mod handlers;
pub mod routes;
pub mod server;

pub use handlers::*;
pub use routes::create_router;
pub use server::{serve_with_grace, SHUTDOWN_GRACE};
