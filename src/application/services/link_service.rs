//! Link creation and resolution service.
//!
//! This is the shortening engine: it orchestrates the slug generator, the
//! durable [`LinkRepository`] and the volatile [`CacheService`].
//!
//! # Creation
//!
//! 1. Normalize and validate the URL (nothing else is touched on failure)
//! 2. Cache `url → slug`; a hit answers immediately
//! 3. Store lookup by URL; an existing link is written back to the cache
//! 4. Slug acquisition: up to [`MAX_SLUG_ATTEMPTS`] candidates checked with
//!    `slug_exists`
//! 5. Persist; a duplicate slug at this point is a terminal failure
//! 6. Write both cache directions
//!
//! # Resolution
//!
//! Cache `slug → url`, then the store. A store hit is written back to the
//! cache, the same discipline as creation.
//!
//! # Known race
//!
//! Two concurrent creations of the same URL can both miss steps 2 and 3 and
//! produce two links. The store only enforces slug uniqueness, so both
//! succeed; later lookups by URL return the oldest one.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError, StoreResult};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheResult, CacheService};
use crate::utils::slug_generator::{DEFAULT_SLUG_LENGTH, SlugGenerator};
use crate::utils::url_normalizer::{UrlValidationError, normalize_and_validate};

/// Upper bound on slug candidates tried for one creation.
pub const MAX_SLUG_ATTEMPTS: usize = 10;

/// Default TTL for both cache directions.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Tunables for [`LinkService`].
#[derive(Debug, Clone)]
pub struct LinkServiceSettings {
    /// Public base URL; short URLs are `{base_url}/{slug}`.
    pub base_url: String,
    pub slug_length: usize,
    pub cache_ttl: Duration,
    /// Deadline for every store call.
    pub store_timeout: Duration,
    /// Deadline for every cache call.
    pub cache_timeout: Duration,
}

impl Default for LinkServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            slug_length: DEFAULT_SLUG_LENGTH,
            cache_ttl: DEFAULT_CACHE_TTL,
            store_timeout: Duration::from_secs(5),
            cache_timeout: Duration::from_millis(500),
        }
    }
}

/// Where a returned mapping came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkSource {
    Cache,
    Store,
    Created,
}

/// Result of [`LinkService::shorten`].
///
/// `id` and `created_at` are unknown on a cache hit, since the cache only
/// holds the slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedLink {
    pub id: Option<i64>,
    pub slug: String,
    pub original_url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub source: LinkSource,
}

impl ShortenedLink {
    fn from_link(link: Link, source: LinkSource) -> Self {
        Self {
            id: Some(link.id),
            slug: link.slug,
            original_url: link.original_url,
            created_at: Some(link.created_at),
            source,
        }
    }

    /// True when the mapping existed before this request.
    pub fn is_existing(&self) -> bool {
        self.source != LinkSource::Created
    }
}

/// Result of [`LinkService::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub original_url: String,
    pub source: LinkSource,
}

/// Service for creating and resolving shortened links.
///
/// Store and cache are injected at construction, so several services can
/// coexist and tests can substitute fakes.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    generator: SlugGenerator,
    settings: LinkServiceSettings,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        settings: LinkServiceSettings,
    ) -> Self {
        Self {
            link_repository,
            cache,
            generator: SlugGenerator::new(settings.slug_length),
            settings,
        }
    }

    pub fn settings(&self) -> &LinkServiceSettings {
        &self.settings
    }

    /// Returns a short link for `raw_url`, creating one on a true miss.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is empty or not an absolute http(s) URL
    /// - [`AppError::SlugExhausted`] if no free slug was found in [`MAX_SLUG_ATTEMPTS`] tries
    /// - [`AppError::Internal`] on store failure, store timeout, or a slug claimed
    ///   concurrently between the availability check and the insert
    pub async fn shorten(&self, raw_url: &str) -> Result<ShortenedLink, AppError> {
        let normalized = normalize_and_validate(raw_url).map_err(validation_error)?;

        if let Some(slug) = self.cache_lookup(self.cache.get_slug(&normalized)).await {
            debug!(slug, "Shorten served from cache");
            metrics::counter!("link_cache_hits_total", "path" => "shorten").increment(1);
            return Ok(ShortenedLink {
                id: None,
                slug,
                original_url: normalized,
                created_at: None,
                source: LinkSource::Cache,
            });
        }
        metrics::counter!("link_cache_misses_total", "path" => "shorten").increment(1);

        if let Some(existing) = self
            .store_call(
                "find_by_original_url",
                self.link_repository.find_by_original_url(&normalized),
            )
            .await?
        {
            debug!(slug = existing.slug, "Shorten served from store");
            self.populate_cache(&existing.slug, &existing.original_url)
                .await;
            return Ok(ShortenedLink::from_link(existing, LinkSource::Store));
        }

        let slug = self.acquire_unique_slug().await?;

        let link = match self
            .store_call(
                "create",
                self.link_repository
                    .create(NewLink::new(slug, normalized)),
            )
            .await
        {
            Ok(link) => link,
            Err(StoreError::DuplicateSlug { slug }) => {
                warn!(slug, "Slug claimed concurrently before insert");
                return Err(AppError::internal(
                    "Failed to generate unique slug",
                    json!({ "reason": "Slug was claimed concurrently" }),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        info!(id = link.id, slug = link.slug, "Short link created");
        metrics::counter!("links_created_total").increment(1);

        self.populate_cache(&link.slug, &link.original_url).await;

        Ok(ShortenedLink::from_link(link, LinkSource::Created))
    }

    /// Resolves a slug to its original URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this slug.
    /// Returns [`AppError::Internal`] on store failure or timeout.
    pub async fn resolve(&self, slug: &str) -> Result<ResolvedLink, AppError> {
        if let Some(original_url) = self.cache_lookup(self.cache.get_url(slug)).await {
            metrics::counter!("link_cache_hits_total", "path" => "resolve").increment(1);
            return Ok(ResolvedLink {
                original_url,
                source: LinkSource::Cache,
            });
        }
        metrics::counter!("link_cache_misses_total", "path" => "resolve").increment(1);

        let link = self
            .store_call("get_by_slug", self.link_repository.get_by_slug(slug))
            .await?;

        self.populate_cache(&link.slug, &link.original_url).await;

        Ok(ResolvedLink {
            original_url: link.original_url,
            source: LinkSource::Store,
        })
    }

    /// Lists every link, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store failure or timeout.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        Ok(self
            .store_call("list_all", self.link_repository.list_all())
            .await?)
    }

    /// Constructs the public short URL for a slug.
    pub fn get_short_url(&self, slug: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), slug)
    }

    /// Checks the store within the store deadline.
    pub async fn store_healthy(&self) -> bool {
        tokio::time::timeout(
            self.settings.store_timeout,
            self.link_repository.health_check(),
        )
        .await
        .unwrap_or(false)
    }

    /// Checks the cache within the cache deadline.
    pub async fn cache_healthy(&self) -> bool {
        tokio::time::timeout(self.settings.cache_timeout, self.cache.health_check())
            .await
            .unwrap_or(false)
    }

    /// Draws candidates until one is free in the store.
    async fn acquire_unique_slug(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let candidate = self.generator.generate();
            if candidate.is_degraded() {
                warn!(
                    fallback_symbols = candidate.fallback_symbols,
                    "Slug generated with degraded randomness"
                );
            }

            let taken = self
                .store_call(
                    "slug_exists",
                    self.link_repository.slug_exists(&candidate.slug),
                )
                .await?;

            if !taken {
                return Ok(candidate.slug);
            }

            metrics::counter!("slug_collisions_total").increment(1);
            debug!(attempt, slug = candidate.slug, "Slug collision");
        }

        warn!(attempts = MAX_SLUG_ATTEMPTS, "Slug acquisition exhausted");
        Err(AppError::SlugExhausted {
            attempts: MAX_SLUG_ATTEMPTS,
        })
    }

    async fn store_call<T, F>(&self, operation: &'static str, call: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        match tokio::time::timeout(self.settings.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout { operation }),
        }
    }

    /// Runs a cache read; errors and timeouts are misses.
    async fn cache_lookup<F>(&self, call: F) -> Option<String>
    where
        F: Future<Output = CacheResult<Option<String>>>,
    {
        match tokio::time::timeout(self.settings.cache_timeout, call).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                warn!(error = %e, "Cache read failed, treating as miss");
                None
            }
            Err(_) => {
                warn!("Cache read timed out, treating as miss");
                None
            }
        }
    }

    /// Writes both cache directions; failures only cost acceleration.
    async fn populate_cache(&self, slug: &str, original_url: &str) {
        let ttl = self.settings.cache_ttl.as_secs();
        let write = self.cache.set_link(slug, original_url, Some(ttl));

        match tokio::time::timeout(self.settings.cache_timeout, write).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(slug, error = %e, "Cache write failed"),
            Err(_) => warn!(slug, "Cache write timed out"),
        }
    }
}

fn validation_error(e: UrlValidationError) -> AppError {
    match e {
        UrlValidationError::Empty => AppError::bad_request("URL is required", json!({})),
        other => AppError::bad_request(
            "Invalid URL format",
            json!({ "reason": other.to_string() }),
        ),
    }
}
