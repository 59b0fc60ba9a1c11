//! Admission control middleware for link creation.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::application::rate_limiter::Admission;
use crate::error::AppError;
use crate::state::AppState;

/// Rejects requests once the shared fixed window is full.
///
/// The limiter is process-wide, not per client: every creation request draws
/// from the same counter. Rejections carry a `Retry-After` header with the
/// time left in the current window.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::post, middleware};
/// use crate::api::middleware::rate_limit;
///
/// let routes = Router::new()
///     .route("/shorten", post(shorten_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    match st.rate_limiter.check() {
        Admission::Admitted { .. } => Ok(next.run(req).await),
        Admission::Rejected { retry_after } => {
            warn!(
                path = %req.uri().path(),
                retry_after_ms = retry_after.as_millis() as u64,
                "Rate limit exceeded"
            );
            metrics::counter!("rate_limited_total").increment(1);
            Err(AppError::rate_limited(retry_after))
        }
    }
}
