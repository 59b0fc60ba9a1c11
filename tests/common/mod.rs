#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use quicklink::application::rate_limiter::{FixedWindowLimiter, RateLimitConfig};
use quicklink::application::services::{LinkService, LinkServiceSettings};
use quicklink::domain::entities::{Link, NewLink};
use quicklink::domain::repositories::LinkRepository;
use quicklink::infrastructure::cache::{CacheError, CacheResult, CacheService};
use quicklink::infrastructure::persistence::MemoryLinkRepository;
use quicklink::routes::build_router;
use quicklink::state::AppState;

pub const BASE_URL: &str = "http://short.test";

/// Cache double that honours TTLs, standing in for Redis.
#[derive(Default)]
pub struct TtlCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl TtlCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn peek_url(&self, slug: &str) -> Option<String> {
        self.get(&format!("slug:{slug}"))
    }

    pub fn peek_slug(&self, original_url: &str) -> Option<String> {
        self.get(&format!("url:{original_url}"))
    }
}

#[async_trait]
impl CacheService for TtlCache {
    async fn get_url(&self, slug: &str) -> CacheResult<Option<String>> {
        Ok(self.peek_url(slug))
    }

    async fn get_slug(&self, original_url: &str) -> CacheResult<Option<String>> {
        Ok(self.peek_slug(original_url))
    }

    async fn set_link(
        &self,
        slug: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_seconds.unwrap_or(86_400));
        let mut entries = self.entries.lock();
        entries.insert(
            format!("slug:{slug}"),
            (original_url.to_string(), expires_at),
        );
        entries.insert(format!("url:{original_url}"), (slug.to_string(), expires_at));
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Cache whose every call fails, like an unreachable Redis.
pub struct BrokenCache;

#[async_trait]
impl CacheService for BrokenCache {
    async fn get_url(&self, _slug: &str) -> CacheResult<Option<String>> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn get_slug(&self, _original_url: &str) -> CacheResult<Option<String>> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn set_link(
        &self,
        _slug: &str,
        _original_url: &str,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

/// Handles a test keeps alongside the server to inspect side effects.
pub struct TestApp {
    pub server: TestServer,
    pub repo: Arc<MemoryLinkRepository>,
    pub cache: Arc<TtlCache>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_rate_limit(RateLimitConfig::default())
    }

    pub fn with_rate_limit(rate_limit: RateLimitConfig) -> Self {
        let repo = Arc::new(MemoryLinkRepository::new());
        let cache = Arc::new(TtlCache::new());
        let state = create_test_state(repo.clone(), cache.clone(), rate_limit);

        Self {
            server: test_server(state),
            repo,
            cache,
        }
    }

    /// Inserts a link straight into the store, bypassing cache and limiter.
    pub async fn insert_link(&self, slug: &str, url: &str) -> Link {
        self.repo.create(NewLink::new(slug, url)).await.unwrap()
    }
}

pub fn create_test_state(
    repo: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    rate_limit: RateLimitConfig,
) -> AppState {
    let settings = LinkServiceSettings {
        base_url: BASE_URL.to_string(),
        ..LinkServiceSettings::default()
    };

    let link_service = Arc::new(LinkService::new(repo, cache, settings));
    let rate_limiter = Arc::new(FixedWindowLimiter::new(rate_limit));

    AppState::new(link_service, rate_limiter)
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state, &["*".to_string()])).unwrap()
}

/// A limit high enough that tests creating many links never hit it.
pub fn unlimited() -> RateLimitConfig {
    RateLimitConfig::new(10_000, Duration::from_secs(60))
}
