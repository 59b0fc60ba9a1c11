//! API route configuration.
//!
//! Only link creation goes through the rate limiter; listing does not.

use crate::api::handlers::{list_links_handler, shorten_handler};
use crate::api::middleware::rate_limit;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// All routes mounted under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten` - Create or look up a short link (rate limited)
/// - `GET  /urls`    - List every link, newest first
pub fn api_routes(state: AppState) -> Router<AppState> {
    let creation = Router::new()
        .route("/shorten", post(shorten_handler))
        .route_layer(middleware::from_fn_with_state(state, rate_limit::layer));

    Router::new()
        .route("/urls", get(list_links_handler))
        .merge(creation)
}
