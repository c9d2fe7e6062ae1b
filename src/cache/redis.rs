//! Redis Cache Backend
//!
//! Delegates the cache contract to a Redis server, which owns expiry and
//! coordination between processes sharing it.
//!
//! Write failures are logged and swallowed, read failures count as misses.
//! Only [`CacheBackend::ping`] reports connectivity problems to the caller.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::{debug, info, warn};

use crate::cache::{CacheBackend, HIT_COUNTER_KEY};
use crate::error::{CacheError, Result};

// == Redis Cache ==
/// Cache backend backed by a Redis server.
///
/// Uses one auto-reconnecting multiplexed connection shared by all callers.
pub struct RedisCache {
    /// Connection handle, `None` once closed
    conn: RwLock<Option<ConnectionManager>>,
    /// Sliding TTL window
    ttl: Duration,
}

impl RedisCache {
    /// Connects to the Redis server at `url`.
    ///
    /// # Arguments
    /// * `url` - Redis connection URL (e.g. "redis://localhost:6379")
    /// * `ttl` - Sliding TTL window, rounded down to whole seconds (minimum 1)
    ///
    /// # Errors
    /// Fails if the URL is invalid or the first connection cannot be made.
    pub async fn connect(url: &str, ttl: Duration) -> Result<Self> {
        let client = Client::open(url)
            .map_err(|e| CacheError::Connection(format!("Invalid Redis URL {}: {}", url, e)))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        info!("Connected to Redis cache backend");

        Ok(Self {
            conn: RwLock::new(Some(conn)),
            ttl,
        })
    }

    /// Clones the shared connection handle.
    fn connection(&self) -> Result<ConnectionManager> {
        self.conn
            .read()
            .map_err(|_| CacheError::Internal("Redis connection lock poisoned".to_string()))?
            .clone()
            .ok_or(CacheError::Closed)
    }

    fn ttl_secs(&self) -> u64 {
        self.ttl.as_secs().max(1)
    }

    /// Fetches a value and refreshes its TTL in one MULTI/EXEC block.
    ///
    /// The key can still expire between two such blocks issued by different
    /// callers; only the refresh side is affected, the value read is consistent.
    async fn fetch_and_refresh(&self, key: &str) -> Result<Option<i64>> {
        let mut conn = self.connection()?;
        let ttl = i64::try_from(self.ttl_secs()).unwrap_or(i64::MAX);

        let (raw, _refreshed): (Option<String>, i64) = redis::pipe()
            .atomic()
            .get(key)
            .expire(key, ttl)
            .query_async(&mut conn)
            .await?;

        Ok(raw.and_then(|value| match value.parse::<i64>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                debug!(key, "Ignoring non-integer value stored in Redis");
                None
            }
        }))
    }

    async fn cached_size(&self) -> Result<usize> {
        let mut conn = self.connection()?;

        let (db_size, has_counter): (usize, bool) = redis::pipe()
            .atomic()
            .cmd("DBSIZE")
            .exists(HIT_COUNTER_KEY)
            .query_async(&mut conn)
            .await?;

        Ok(db_size.saturating_sub(usize::from(has_counter)))
    }

    async fn store(&self, key: &str, value: i64) -> Result<()> {
        let mut conn = self.connection()?;
        let _: () = conn.set_ex(key, value, self.ttl_secs()).await?;
        Ok(())
    }

    async fn increment_hits(&self) -> Result<i64> {
        let mut conn = self.connection()?;
        Ok(conn.incr(HIT_COUNTER_KEY, 1).await?)
    }

    async fn read_hits(&self) -> Result<u64> {
        let mut conn = self.connection()?;
        let count: Option<u64> = conn.get(HIT_COUNTER_KEY).await?;
        Ok(count.unwrap_or(0))
    }

    async fn flush_db(&self) -> Result<()> {
        let mut conn = self.connection()?;
        let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &str) -> Option<i64> {
        match self.fetch_and_refresh(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, "Redis GET failed, treating as miss: {}", e);
                None
            }
        }
    }

    async fn set_with_ttl(&self, key: &str, value: i64) {
        if let Err(e) = self.store(key, value).await {
            warn!(key, "Redis SET failed: {}", e);
        }
    }

    async fn incr_counter(&self) {
        if let Err(e) = self.increment_hits().await {
            warn!("Redis INCR of hit counter failed: {}", e);
        }
    }

    async fn counter(&self) -> u64 {
        self.read_hits().await.unwrap_or_else(|e| {
            warn!("Redis GET of hit counter failed: {}", e);
            0
        })
    }

    async fn size(&self) -> usize {
        self.cached_size().await.unwrap_or_else(|e| {
            warn!("Redis DBSIZE failed: {}", e);
            0
        })
    }

    async fn flush(&self) {
        if let Err(e) = self.flush_db().await {
            warn!("Redis FLUSHDB failed: {}", e);
        }
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection()?;
        let _pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn close(&self) {
        let released = match self.conn.write() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };

        if released.is_some() {
            info!("Redis cache backend closed");
        }
    }
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let open = self.conn.read().map(|c| c.is_some()).unwrap_or(false);
        f.debug_struct("RedisCache")
            .field("ttl", &self.ttl)
            .field("open", &open)
            .finish()
    }
}
