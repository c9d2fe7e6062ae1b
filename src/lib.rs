//! Calc Cache - arithmetic served through a TTL result cache
//!
//! Results of `add`, `subtract`, `multiply` and `divide` are memoized in a
//! cache backed by local memory or Redis, with a sliding expiry window.

pub mod api;
pub mod cache;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{Backend, CacheBackend};
pub use config::Config;
pub use dispatch::{Operation, Resolver};
