//! Joined read views over vaccination records.
//!
//! # Responsibility
//! - Embed patient and vaccine display summaries into record views.
//! - Serve plain patient/vaccine lists for the presentation layer.
//!
//! # Invariants
//! - Views are derived on read; nothing here writes.
//! - An unresolvable reference never fails the read: the summary keeps the
//!   raw id and carries a sentinel label instead.
//! - Record views keep insertion order.

use crate::model::lifecycle::RecordStatus;
use crate::model::patient::Patient;
use crate::model::vaccine::Vaccine;
use crate::model::{EntityId, EntityKind, RecordId};
use crate::repo::patient_repo::{PatientRepository, SqlitePatientRepository};
use crate::repo::record_repo::{parse_record_row, push_record_filters, RecordListQuery};
use crate::repo::vaccine_repo::{SqliteVaccineRepository, VaccineRepository};
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params_from_iter, Connection, Row};
use serde::Serialize;

/// Label shown when a record's patient cannot be resolved.
pub const UNKNOWN_PATIENT_LABEL: &str = "Unknown Patient";
/// Label shown when a record's vaccine cannot be resolved.
pub const UNKNOWN_VACCINE_LABEL: &str = "Unknown Vaccine";

const RECORD_VIEW_SELECT_SQL: &str = "SELECT
    r.id AS id,
    r.patient_id AS patient_id,
    r.vaccine_id AS vaccine_id,
    r.dose AS dose,
    r.administered AS administered,
    r.next_due AS next_due,
    r.status AS status,
    p.name AS patient_name,
    v.name AS vaccine_name
FROM vaccination_records r
LEFT JOIN patients p ON p.id = r.patient_id
LEFT JOIN vaccines v ON v.id = r.vaccine_id";

/// Display summary of a referenced entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySummary {
    pub id: EntityId,
    pub name: String,
}

/// Record with its patient and vaccine summaries embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub id: RecordId,
    pub patient: EntitySummary,
    pub vaccine: EntitySummary,
    pub dose: u32,
    pub administered: NaiveDate,
    pub next_due: Option<NaiveDate>,
    pub status: RecordStatus,
}

/// Lists record views matching `query`, in insertion order.
pub fn list_records_with_joins(
    conn: &Connection,
    query: &RecordListQuery,
) -> RepoResult<Vec<RecordView>> {
    let mut sql = format!("{RECORD_VIEW_SELECT_SQL} WHERE 1 = 1");
    let bind_values = push_record_filters(&mut sql, query, "r.");
    sql.push_str(" ORDER BY r.seq ASC");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut views = Vec::new();
    while let Some(row) = rows.next()? {
        views.push(parse_record_view_row(row)?);
    }
    Ok(views)
}

/// Loads one record view, failing with `NotFound` when the record is absent.
pub fn get_record_with_joins(conn: &Connection, id: RecordId) -> RepoResult<RecordView> {
    let mut stmt = conn.prepare(&format!("{RECORD_VIEW_SELECT_SQL} WHERE r.id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => parse_record_view_row(row),
        None => Err(RepoError::NotFound {
            kind: EntityKind::Record,
            id,
        }),
    }
}

/// Plain patient list in insertion order.
pub fn list_patients(conn: &Connection) -> RepoResult<Vec<Patient>> {
    SqlitePatientRepository::try_new(conn)?.list_patients()
}

/// Plain vaccine list in insertion order.
pub fn list_vaccines(conn: &Connection) -> RepoResult<Vec<Vaccine>> {
    SqliteVaccineRepository::try_new(conn)?.list_vaccines()
}

fn parse_record_view_row(row: &Row<'_>) -> RepoResult<RecordView> {
    let record = parse_record_row(row)?;
    let patient_name: Option<String> = row.get("patient_name")?;
    let vaccine_name: Option<String> = row.get("vaccine_name")?;

    Ok(RecordView {
        id: record.id,
        patient: EntitySummary {
            id: record.patient_id,
            name: patient_name.unwrap_or_else(|| UNKNOWN_PATIENT_LABEL.to_string()),
        },
        vaccine: EntitySummary {
            id: record.vaccine_id,
            name: vaccine_name.unwrap_or_else(|| UNKNOWN_VACCINE_LABEL.to_string()),
        },
        dose: record.dose,
        administered: record.administered,
        next_due: record.next_due,
        status: record.status,
    })
}
