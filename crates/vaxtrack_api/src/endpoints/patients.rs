//! Patient registration endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rusqlite::Connection;
use vaxtrack_core::{Patient, PatientService, RepoResult, SqlitePatientRepository};

use crate::error::ApiError;
use crate::state::AppState;
use crate::wire::{parse_path_id, PatientPayload};

fn service(conn: &Connection) -> RepoResult<PatientService<SqlitePatientRepository<'_>>> {
    Ok(PatientService::new(SqlitePatientRepository::try_new(conn)?))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Patient>>, ApiError> {
    let patients = state.with_conn(|conn| service(conn)?.list_patients())?;
    Ok(Json(patients))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<PatientPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let Json(payload) = payload?;
    let draft = payload.into_draft()?;
    let patient = state.with_conn(|conn| service(conn)?.create_patient(&draft))?;
    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    let id = parse_path_id(&raw_id, "patient")?;
    let patient = state.with_conn(|conn| service(conn)?.get_patient(id))?;
    Ok(Json(patient))
}

pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<PatientPayload>, JsonRejection>,
) -> Result<Json<Patient>, ApiError> {
    let id = parse_path_id(&raw_id, "patient")?;
    let Json(payload) = payload?;
    let patch = payload.into_patch();
    let patient = state.with_conn(|conn| service(conn)?.update_patient(id, &patch))?;
    Ok(Json(patient))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_path_id(&raw_id, "patient")?;
    state.with_conn(|conn| service(conn)?.delete_patient(id))?;
    Ok(StatusCode::NO_CONTENT)
}
