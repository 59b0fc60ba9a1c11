//! Application layer: business logic built on the domain traits.
//!
//! # Contents
//!
//! - [`services::link_service::LinkService`] - Short link creation and resolution
//! - [`rate_limiter::FixedWindowLimiter`] - Admission control for link creation

pub mod rate_limiter;
pub mod services;
