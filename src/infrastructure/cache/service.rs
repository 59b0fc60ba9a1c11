//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Bidirectional slug ↔ URL cache.
///
/// The cache is an accelerator, never a source of truth. Implementations must
/// be thread-safe and fail open: transport errors are logged and reported as a
/// miss (reads) or as success (writes), so an unavailable cache degrades to
/// store lookups instead of failing requests.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Looks up the original URL for a slug (`slug → url` direction).
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    async fn get_url(&self, slug: &str) -> CacheResult<Option<String>>;

    /// Looks up the slug for a normalized URL (`url → slug` direction).
    ///
    /// Same fail-open contract as [`CacheService::get_url`].
    async fn get_slug(&self, original_url: &str) -> CacheResult<Option<String>>;

    /// Stores both directions of a mapping, each with the same TTL.
    ///
    /// # Arguments
    ///
    /// - `slug` - The short slug
    /// - `original_url` - The normalized URL
    /// - `ttl_seconds` - TTL in seconds (implementation default if `None`)
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers. Implementations log failures and
    /// return `Ok(())`; a failed write only forgoes acceleration.
    async fn set_link(
        &self,
        slug: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
