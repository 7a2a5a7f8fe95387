//! HTTP surface for vaxtrack.
//!
//! # Responsibility
//! - Expose vaccine, patient and record CRUD plus joined record views as
//!   JSON over REST under `/api/`.
//! - Translate core errors into status codes.
//!
//! # Invariants
//! - Handlers never bypass core services or projections.
//! - Handlers never panic; every failure becomes an `ApiError` response.

pub mod config;
pub mod endpoints;
pub mod error;
mod middleware;
pub mod router;
pub mod server;
pub mod state;
pub mod wire;

pub use config::ServerConfig;
pub use error::ApiError;
pub use router::build_router;
pub use server::serve;
pub use state::AppState;
