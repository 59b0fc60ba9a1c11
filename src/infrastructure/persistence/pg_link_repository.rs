//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError, StoreResult};
use crate::utils::db_error::is_unique_violation_on_slug;

/// Row shape shared by every `links` query.
#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    slug: String,
    original_url: String,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(r.id, r.slug, r.original_url, r.created_at)
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses SQLx prepared statements for SQL injection protection. Slug uniqueness
/// is enforced by the `links_slug_key` constraint; violations are reported as
/// [`StoreError::DuplicateSlug`].
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> StoreResult<Link> {
        let result = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (slug, original_url)
            VALUES ($1, $2)
            RETURNING id, slug, original_url, created_at
            "#,
        )
        .bind(&new_link.slug)
        .bind(&new_link.original_url)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) if is_unique_violation_on_slug(&e) => {
                Err(StoreError::duplicate_slug(new_link.slug))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_by_slug(&self, slug: &str) -> StoreResult<Link> {
        sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, slug, original_url, created_at
            FROM links
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?
        .map(Link::from)
        .ok_or_else(|| StoreError::not_found(slug))
    }

    async fn find_by_original_url(&self, original_url: &str) -> StoreResult<Option<Link>> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, slug, original_url, created_at
            FROM links
            WHERE md5(original_url) = md5($1) AND original_url = $1
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn slug_exists(&self, slug: &str) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM links WHERE slug = $1)")
                .bind(slug)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn list_all(&self) -> StoreResult<Vec<Link>> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, slug, original_url, created_at
            FROM links
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
