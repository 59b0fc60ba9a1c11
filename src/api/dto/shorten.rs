//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{LinkSource, ShortenedLink};

/// Request to shorten a single URL.
///
/// A missing `url` field deserializes to an empty string so it is reported
/// the same way as an empty one.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to shorten. A scheme is optional; `https://` is assumed.
    #[serde(default)]
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,
}

/// Response for `POST /api/shorten`.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub slug: String,
    pub original_url: String,
    pub short_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// True only when the answer came from the cache.
    pub cached: bool,
    pub source: LinkSource,
}

impl ShortenResponse {
    pub fn new(link: ShortenedLink, short_url: String) -> Self {
        Self {
            id: link.id,
            cached: link.source == LinkSource::Cache,
            source: link.source,
            slug: link.slug,
            original_url: link.original_url,
            short_url,
            created_at: link.created_at,
        }
    }
}
