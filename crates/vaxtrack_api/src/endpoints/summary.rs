//! Dashboard summary endpoint.

use axum::extract::State;
use axum::Json;
use vaxtrack_core::{summarize, DashboardSummary};

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/summary`: collection sizes and record counts per status.
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardSummary>, ApiError> {
    let summary = state.with_conn(summarize)?;
    Ok(Json(summary))
}
