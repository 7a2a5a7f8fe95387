//! HTTP endpoint handlers, one module per resource.

pub mod health;
pub mod patients;
pub mod records;
pub mod summary;
pub mod vaccines;
