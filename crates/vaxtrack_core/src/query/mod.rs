//! Read-side projections.
//!
//! # Responsibility
//! - Materialize joined views for list/detail display.
//! - Keep projections separate from the authoritative per-collection tables.

pub mod projection;
pub mod summary;
