//! DTOs for the link listing endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Link;

/// One entry of `GET /api/urls`.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub slug: String,
    pub original_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            slug: link.slug,
            original_url: link.original_url,
            short_url,
            created_at: link.created_at,
        }
    }
}
