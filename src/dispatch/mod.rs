//! Dispatch Module
//!
//! Derives cache keys from an operation and its operands, and runs the
//! lookup-or-compute flow against a cache backend.

mod operation;
mod resolver;


pub use operation::{cache_key, Operation};
pub use resolver::{Resolution, Resolver};
