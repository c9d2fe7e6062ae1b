//! Lookup-or-compute flow over a cache backend.

use std::sync::Arc;

use tracing::debug;

use crate::cache::CacheBackend;
use crate::dispatch::{cache_key, Operation};

/// Outcome of resolving one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Computed or cached result
    pub answer: i64,
    /// True when the answer came from the cache
    pub cached: bool,
}

/// Serves calculations from the cache, computing and storing on a miss.
#[derive(Clone)]
pub struct Resolver {
    cache: Arc<dyn CacheBackend>,
}

impl Resolver {
    /// Creates a resolver on top of `cache`.
    pub fn new(cache: Arc<dyn CacheBackend>) -> Self {
        Self { cache }
    }

    /// Backend this resolver reads from and writes to.
    pub fn cache(&self) -> &Arc<dyn CacheBackend> {
        &self.cache
    }

    /// Resolves an operation given by its short name (`add`, `sub`, `mul`, `div`).
    ///
    /// # Panics
    /// Panics on an unknown name. Operation names are fixed by the caller,
    /// so an unknown one is a programming error.
    pub async fn resolve(&self, name: &str, x: i64, y: i64) -> Resolution {
        let op = Operation::from_name(name)
            .unwrap_or_else(|| panic!("invalid cache key prefix {}", name));
        self.resolve_op(op, x, y).await
    }

    /// Returns the cached result of `x <op> y`, or computes and caches it.
    ///
    /// A hit bumps the backend's hit counter. Backend failures surface as
    /// misses, so the answer is always computed correctly.
    ///
    /// # Panics
    /// Panics when dividing by zero. Divisors are validated upstream.
    pub async fn resolve_op(&self, op: Operation, x: i64, y: i64) -> Resolution {
        assert!(
            !(op == Operation::Divide && y == 0),
            "division by zero must be rejected before dispatch"
        );

        let key = cache_key(op, x, y);
        if let Some(answer) = self.cache.get(&key).await {
            self.cache.incr_counter().await;
            debug!(key = %key, answer, "Cache hit");
            return Resolution {
                answer,
                cached: true,
            };
        }

        let answer = op.apply(x, y);
        self.cache.set_with_ttl(&key, answer).await;
        debug!(key = %key, answer, "Cache miss, stored result");

        Resolution {
            answer,
            cached: false,
        }
    }
}
