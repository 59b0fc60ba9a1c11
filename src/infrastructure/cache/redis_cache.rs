//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

const SLUG_KEY_PREFIX: &str = "slug:";
const URL_KEY_PREFIX: &str = "url:";

/// Redis cache implementation for fast slug and URL lookups.
///
/// Each link is stored under two keys, `slug:{slug}` → URL and `url:{url}` →
/// slug, written in one pipeline with the same TTL. The `ConnectionManager`
/// reconnects transparently. All operations are fail-open: errors are logged
/// but don't propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL applied when [`CacheService::set_link`]
    ///   is called with `ttl_seconds = None`; controlled via `CACHE_TTL_SECONDS`
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
        })
    }

    fn slug_key(slug: &str) -> String {
        format!("{SLUG_KEY_PREFIX}{slug}")
    }

    fn url_key(original_url: &str) -> String {
        format!("{URL_KEY_PREFIX}{original_url}")
    }

    async fn get_string(&self, key: &str) -> Option<String> {
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(value)) => {
                debug!(key, "Cache HIT");
                Some(value)
            }
            Ok(None) => {
                debug!(key, "Cache MISS");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Redis GET error, treating as miss");
                None
            }
        }
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, slug: &str) -> CacheResult<Option<String>> {
        Ok(self.get_string(&Self::slug_key(slug)).await)
    }

    async fn get_slug(&self, original_url: &str) -> CacheResult<Option<String>> {
        Ok(self.get_string(&Self::url_key(original_url)).await)
    }

    async fn set_link(
        &self,
        slug: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let mut conn = self.client.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        let result = redis::pipe()
            .set_ex(Self::slug_key(slug), original_url, ttl)
            .ignore()
            .set_ex(Self::url_key(original_url), slug, ttl)
            .ignore()
            .query_async::<()>(&mut conn)
            .await;

        match result {
            Ok(()) => {
                debug!(slug, original_url, ttl, "Cache SET");
            }
            Err(e) => {
                warn!(slug, error = %e, "Redis SET error, skipping cache write");
            }
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
