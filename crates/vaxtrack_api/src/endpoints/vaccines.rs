//! Vaccine catalogue endpoints.
//!
//! - `GET /api/vaccines`, `POST /api/vaccines`
//! - `GET|PUT|DELETE /api/vaccines/:id`

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rusqlite::Connection;
use vaxtrack_core::{RepoResult, SqliteVaccineRepository, Vaccine, VaccineService};

use crate::error::ApiError;
use crate::state::AppState;
use crate::wire::{parse_path_id, VaccinePayload};

fn service(conn: &Connection) -> RepoResult<VaccineService<SqliteVaccineRepository<'_>>> {
    Ok(VaccineService::new(SqliteVaccineRepository::try_new(conn)?))
}

/// `GET /api/vaccines`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Vaccine>>, ApiError> {
    let vaccines = state.with_conn(|conn| service(conn)?.list_vaccines())?;
    Ok(Json(vaccines))
}

/// `POST /api/vaccines`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<VaccinePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Vaccine>), ApiError> {
    let Json(payload) = payload?;
    let draft = payload.into_draft();
    let vaccine = state.with_conn(|conn| service(conn)?.create_vaccine(&draft))?;
    Ok((StatusCode::CREATED, Json(vaccine)))
}

/// `GET /api/vaccines/:id`
pub async fn detail(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Vaccine>, ApiError> {
    let id = parse_path_id(&raw_id, "vaccine")?;
    let vaccine = state.with_conn(|conn| service(conn)?.get_vaccine(id))?;
    Ok(Json(vaccine))
}

/// `PUT /api/vaccines/:id`
pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<VaccinePayload>, JsonRejection>,
) -> Result<Json<Vaccine>, ApiError> {
    let id = parse_path_id(&raw_id, "vaccine")?;
    let Json(payload) = payload?;
    let patch = payload.into_patch();
    let vaccine = state.with_conn(|conn| service(conn)?.update_vaccine(id, &patch))?;
    Ok(Json(vaccine))
}

/// `DELETE /api/vaccines/:id`; 409 while any record references it.
pub async fn remove(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_path_id(&raw_id, "vaccine")?;
    state.with_conn(|conn| service(conn)?.delete_vaccine(id))?;
    Ok(StatusCode::NO_CONTENT)
}
