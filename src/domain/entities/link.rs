//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL link.
///
/// Links are created once by [`crate::application::services::LinkService`] and
/// are never modified afterwards. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub slug: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(id: i64, slug: String, original_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            slug,
            original_url,
            created_at,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub slug: String,
    pub original_url: String,
}

impl NewLink {
    pub fn new(slug: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            original_url: original_url.into(),
        }
    }
}
