//! In-process implementation of link repository.
//!
//! Mirrors the PostgreSQL semantics (monotonic ids, slug uniqueness, newest
//! first listing) without a database. Data lives only as long as the process,
//! so it suits tests and local development (`STORAGE_BACKEND=memory`).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError, StoreResult};

#[derive(Default)]
struct Inner {
    links: Vec<Link>,
    by_slug: HashMap<String, usize>,
    last_id: i64,
}

/// Link repository backed by a vector and a slug index behind one lock.
#[derive(Default)]
pub struct MemoryLinkRepository {
    inner: RwLock<Inner>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> StoreResult<Link> {
        let mut inner = self.inner.write();

        if inner.by_slug.contains_key(&new_link.slug) {
            return Err(StoreError::duplicate_slug(new_link.slug));
        }

        inner.last_id += 1;
        let link = Link::new(
            inner.last_id,
            new_link.slug,
            new_link.original_url,
            Utc::now(),
        );

        let index = inner.links.len();
        inner.by_slug.insert(link.slug.clone(), index);
        inner.links.push(link.clone());

        Ok(link)
    }

    async fn get_by_slug(&self, slug: &str) -> StoreResult<Link> {
        let inner = self.inner.read();
        inner
            .by_slug
            .get(slug)
            .map(|&i| inner.links[i].clone())
            .ok_or_else(|| StoreError::not_found(slug))
    }

    async fn find_by_original_url(&self, original_url: &str) -> StoreResult<Option<Link>> {
        let inner = self.inner.read();
        Ok(inner
            .links
            .iter()
            .find(|l| l.original_url == original_url)
            .cloned())
    }

    async fn slug_exists(&self, slug: &str) -> StoreResult<bool> {
        Ok(self.inner.read().by_slug.contains_key(slug))
    }

    async fn list_all(&self) -> StoreResult<Vec<Link>> {
        let mut links = self.inner.read().links.clone();
        links.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(links)
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.inner.read().links.len() as i64)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
