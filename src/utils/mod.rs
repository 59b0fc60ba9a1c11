//! Utility functions for slug generation and URL processing.
//!
//! - [`slug_generator`] - Random slug generation over a 62-symbol alphabet
//! - [`url_normalizer`] - URL normalization and validation
//! - [`db_error`] - Database error classification

pub mod db_error;
pub mod slug_generator;
pub mod url_normalizer;
