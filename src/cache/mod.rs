//! Cache Module
//!
//! TTL result cache with two interchangeable backends: local memory and Redis.
//!
//! Every backend implements [`CacheBackend`]. The binary picks one at startup
//! through [`Backend::from_config`] and shares it as `Arc<dyn CacheBackend>`.

mod entry;
mod memory;
mod redis;


use async_trait::async_trait;

use crate::config::Config;
use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use memory::{purge_expired, MemoryCache, SharedEntries};
pub use self::redis::RedisCache;

// == Public Constants ==
/// Key of the hit counter in the Redis backend
pub const HIT_COUNTER_KEY: &str = "hit";

// == Backend Contract ==
/// Capability contract shared by every cache backend.
///
/// All methods are safe to call concurrently. Values are returned by copy,
/// so callers never hold a reference into backend storage.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the value if present and not expired, restarting its TTL window.
    async fn get(&self, key: &str) -> Option<i64>;

    /// Inserts or overwrites `key`, expiring one TTL window from now.
    async fn set_with_ttl(&self, key: &str, value: i64);

    /// Adds one to the hit counter.
    async fn incr_counter(&self);

    /// Current hit counter value.
    async fn counter(&self) -> u64;

    /// Approximate number of cached results.
    async fn size(&self) -> usize;

    /// Drops every entry and resets the hit counter.
    async fn flush(&self);

    /// Liveness check.
    async fn ping(&self) -> Result<()>;

    /// Releases background tasks and connections.
    async fn close(&self);
}

// == Backend Selection ==
/// The backend chosen at startup.
pub enum Backend {
    /// Local memory with a background sweeper
    Memory(MemoryCache),
    /// External Redis server
    Redis(RedisCache),
}

impl Backend {
    /// Builds the backend described by `config`.
    ///
    /// A Redis URL selects the networked backend; otherwise local memory is
    /// used. Must be called from within a tokio runtime.
    pub async fn from_config(config: &Config) -> Result<Self> {
        match config.redis_url.as_deref() {
            Some(url) => Ok(Self::Redis(RedisCache::connect(url, config.ttl()).await?)),
            None => Ok(Self::Memory(MemoryCache::new(
                config.ttl(),
                config.sweep_every(),
            ))),
        }
    }

    /// Short backend name for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Redis(_) => "redis",
        }
    }

    fn inner(&self) -> &dyn CacheBackend {
        match self {
            Self::Memory(cache) => cache,
            Self::Redis(cache) => cache,
        }
    }
}

#[async_trait]
impl CacheBackend for Backend {
    async fn get(&self, key: &str) -> Option<i64> {
        self.inner().get(key).await
    }

    async fn set_with_ttl(&self, key: &str, value: i64) {
        self.inner().set_with_ttl(key, value).await
    }

    async fn incr_counter(&self) {
        self.inner().incr_counter().await
    }

    async fn counter(&self) -> u64 {
        self.inner().counter().await
    }

    async fn size(&self) -> usize {
        self.inner().size().await
    }

    async fn flush(&self) {
        self.inner().flush().await
    }

    async fn ping(&self) -> Result<()> {
        self.inner().ping().await
    }

    async fn close(&self) {
        self.inner().close().await
    }
}
