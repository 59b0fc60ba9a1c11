//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL mapping
//!
//! Entities follow the "New Type" pattern with a separate struct for creation:
//! [`NewLink`] carries only the fields the caller chooses, the store assigns the rest.

pub mod link;

pub use link::{Link, NewLink};
