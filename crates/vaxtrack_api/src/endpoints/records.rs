//! Vaccination record endpoints.
//!
//! Reads return joined views (`patient`/`vaccine` summaries embedded);
//! writes return the stored record with raw reference ids.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rusqlite::Connection;
use vaxtrack_core::{
    get_record_with_joins, list_records_with_joins, RecordListQuery, RecordService, RecordView,
    RepoResult, SqliteRecordRepository, VaccinationRecord,
};

use crate::error::ApiError;
use crate::state::AppState;
use crate::wire::{parse_path_id, RecordFilter, RecordPayload};

fn service(conn: &Connection) -> RepoResult<RecordService<SqliteRecordRepository<'_>>> {
    Ok(RecordService::new(SqliteRecordRepository::try_new(conn)?))
}

/// `GET /api/records?patientId=&vaccineId=&status=`
pub async fn list(
    State(state): State<AppState>,
    filter: Result<Query<RecordFilter>, QueryRejection>,
) -> Result<Json<Vec<RecordView>>, ApiError> {
    let Query(filter) = filter?;
    let query = RecordListQuery::from(filter);
    let views = state.with_conn(|conn| list_records_with_joins(conn, &query))?;
    Ok(Json(views))
}

/// `POST /api/records`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<RecordPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<VaccinationRecord>), ApiError> {
    let Json(payload) = payload?;
    let draft = payload.into_draft()?;
    let write = state.with_conn(|conn| service(conn)?.create_record(&draft))?;
    Ok((StatusCode::CREATED, Json(write.record)))
}

/// `GET /api/records/:id`
pub async fn detail(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<RecordView>, ApiError> {
    let id = parse_path_id(&raw_id, "record")?;
    let view = state.with_conn(|conn| get_record_with_joins(conn, id))?;
    Ok(Json(view))
}

/// `PUT /api/records/:id`
pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<RecordPayload>, JsonRejection>,
) -> Result<Json<VaccinationRecord>, ApiError> {
    let id = parse_path_id(&raw_id, "record")?;
    let Json(payload) = payload?;
    let patch = payload.into_patch();
    let write = state.with_conn(|conn| service(conn)?.update_record(id, &patch))?;
    Ok(Json(write.record))
}

/// `DELETE /api/records/:id`
pub async fn remove(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_path_id(&raw_id, "record")?;
    state.with_conn(|conn| service(conn)?.delete_record(id))?;
    Ok(StatusCode::NO_CONTENT)
}
