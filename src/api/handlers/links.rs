//! Handler for the link listing endpoint.

use axum::{Json, extract::State};

use crate::api::dto::links::LinkResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every shortened link, newest first.
///
/// # Endpoint
///
/// `GET /api/urls`
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.link_service.list_links().await?;

    let items = links
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.get_short_url(&link.slug);
            LinkResponse::new(link, short_url)
        })
        .collect();

    Ok(Json(items))
}
