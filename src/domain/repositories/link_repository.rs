//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by [`LinkRepository`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No link exists for the requested slug.
    #[error("Link not found: {slug}")]
    NotFound { slug: String },

    /// The slug uniqueness constraint rejected an insert.
    #[error("Slug already exists: {slug}")]
    DuplicateSlug { slug: String },

    /// The backing store did not answer within the configured deadline.
    #[error("Store operation timed out: {operation}")]
    Timeout { operation: &'static str },

    /// Any other backend failure.
    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    pub fn not_found(slug: impl Into<String>) -> Self {
        Self::NotFound { slug: slug.into() }
    }

    pub fn duplicate_slug(slug: impl Into<String>) -> Self {
        Self::DuplicateSlug { slug: slug.into() }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(e.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Repository interface for the durable slug ↔ URL mapping.
///
/// The store is the source of truth: it assigns ids and creation timestamps
/// and enforces slug uniqueness.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - in-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateSlug`] if the slug is already taken, so the
    /// caller can tell a collision apart from a broken backend.
    async fn create(&self, new_link: NewLink) -> StoreResult<Link>;

    /// Fetches a link by slug.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no link has this slug.
    async fn get_by_slug(&self, slug: &str) -> StoreResult<Link>;

    /// Finds a link by its normalized original URL.
    ///
    /// `Ok(None)` means "checked, not found" and is not an error. When several
    /// links share the URL the oldest one is returned.
    async fn find_by_original_url(&self, original_url: &str) -> StoreResult<Option<Link>>;

    /// Returns whether a link with this slug exists.
    async fn slug_exists(&self, slug: &str) -> StoreResult<bool>;

    /// Returns every link, newest first (`created_at DESC`, then `id DESC`).
    async fn list_all(&self) -> StoreResult<Vec<Link>>;

    /// Counts all stored links.
    async fn count(&self) -> StoreResult<i64>;

    /// Checks that the backend is reachable.
    async fn health_check(&self) -> bool;
}
