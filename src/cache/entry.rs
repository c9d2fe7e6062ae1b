//! Cache Entry Module
//!
//! Defines the structure for individual in-process cache entries with
//! sliding TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A cached result together with its absolute expiry time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    /// The stored result
    pub value: i64,
    /// Instant at which the entry stops being served
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry that expires `ttl` from now.
    pub fn new(value: i64, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: once the current time reaches `expires_at` the
    /// entry is expired.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    // == Touch ==
    /// Restarts the TTL window so the entry lives a full `ttl` from now.
    pub fn touch(&mut self, ttl: Duration) {
        self.expires_at = Instant::now() + ttl;
    }

    // == Time To Live ==
    /// Returns remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
