//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::rate_limiter::FixedWindowLimiter;
use crate::application::services::LinkService;

/// Handles cloned into each request.
///
/// The rate limiter lives here rather than in a global so that every router
/// built from a state gets its own window.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub rate_limiter: Arc<FixedWindowLimiter>,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService>, rate_limiter: Arc<FixedWindowLimiter>) -> Self {
        Self {
            link_service,
            rate_limiter,
        }
    }
}
