//! HTTP router.
//!
//! Routes are nested under `/api/`. Path params use `:param` syntax
//! (matchit 0.7 / axum 0.7).

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::endpoints;
use crate::middleware;
use crate::state::AppState;

/// Builds the full application router over `state`.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/summary", get(endpoints::summary::dashboard))
        .route(
            "/vaccines",
            get(endpoints::vaccines::list).post(endpoints::vaccines::create),
        )
        .route(
            "/vaccines/:id",
            get(endpoints::vaccines::detail)
                .put(endpoints::vaccines::update)
                .delete(endpoints::vaccines::remove),
        )
        .route(
            "/patients",
            get(endpoints::patients::list).post(endpoints::patients::create),
        )
        .route(
            "/patients/:id",
            get(endpoints::patients::detail)
                .put(endpoints::patients::update)
                .delete(endpoints::patients::remove),
        )
        .route(
            "/records",
            get(endpoints::records::list).post(endpoints::records::create),
        )
        .route(
            "/records/:id",
            get(endpoints::records::detail)
                .put(endpoints::records::update)
                .delete(endpoints::records::remove),
        )
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(axum::middleware::from_fn(middleware::log_request))
        // Browser UI is served from another origin.
        .layer(CorsLayer::permissive())
}
