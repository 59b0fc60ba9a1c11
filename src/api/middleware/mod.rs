//! HTTP middleware for request processing and protection.
//!
//! Provides admission control for link creation and request tracing.

pub mod rate_limit;
pub mod tracing;
