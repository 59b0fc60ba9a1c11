//! Handler for link shortening endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns a short link for the given URL, creating one if needed.
///
/// # Endpoint
///
/// `POST /api/shorten` (rate limited)
///
/// # Request Body
///
/// ```json
/// { "url": "example.com/a" }
/// ```
///
/// # Response
///
/// `200 OK` both for a new link and for a URL that was already shortened;
/// `source` tells the two apart:
///
/// ```json
/// {
///   "id": 1,
///   "slug": "aZ3k9Q",
///   "original_url": "https://example.com/a",
///   "short_url": "http://localhost:8080/aZ3k9Q",
///   "created_at": "2025-01-01T00:00:00Z",
///   "cached": false,
///   "source": "created"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for malformed JSON, a missing or invalid URL.
/// Returns 500 if the store fails or no free slug could be found.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, axum::extract::rejection::JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state.link_service.shorten(&payload.url).await?;

    let short_url = state.link_service.get_short_url(&link.slug);

    Ok(Json(ShortenResponse::new(link, short_url)))
}
