//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a slug to its original URL.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// Never rate limited. The cache is consulted first; a miss falls through to
/// the store and the result is written back to the cache.
///
/// # Errors
///
/// Returns 404 Not Found if the slug doesn't exist.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let resolved = state.link_service.resolve(&slug).await?;

    debug!(slug, source = ?resolved.source, "Redirecting");

    Ok(Redirect::temporary(&resolved.original_url))
}
