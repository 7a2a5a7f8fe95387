//! Vaccination record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist records with their patient/vaccine references resolved.
//! - Report soft dose-count advisories found during a write.
//!
//! # Invariants
//! - Create/update resolve both references inside the write transaction;
//!   a dangling reference aborts the write with nothing persisted.
//! - Deleting a record never touches patients or vaccines.

use crate::model::lifecycle::{dose_advisory, DoseAdvisory, RecordStatus};
use crate::model::record::{RecordDraft, RecordPatch, VaccinationRecord};
use crate::model::{EntityKind, PatientId, RecordId, VaccineId};
use crate::repo::guard::resolve_record_references;
use crate::repo::{
    ensure_connection_ready, format_date, parse_date, parse_uuid, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const RECORD_SELECT_SQL: &str = "SELECT
    id,
    patient_id,
    vaccine_id,
    dose,
    administered,
    next_due,
    status
FROM vaccination_records";

/// Optional filters for record listing. Empty query lists everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordListQuery {
    pub patient_id: Option<PatientId>,
    pub vaccine_id: Option<VaccineId>,
    pub status: Option<RecordStatus>,
}

/// Outcome of a successful record create/update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordWrite {
    pub record: VaccinationRecord,
    /// Set when the dose number runs past the vaccine series.
    pub advisory: Option<DoseAdvisory>,
}

/// Repository interface for vaccination records.
pub trait RecordRepository {
    fn create_record(&self, draft: &RecordDraft) -> RepoResult<RecordWrite>;
    fn update_record(&self, id: RecordId, patch: &RecordPatch) -> RepoResult<RecordWrite>;
    fn get_record(&self, id: RecordId) -> RepoResult<Option<VaccinationRecord>>;
    /// Lists matching records in insertion order.
    fn list_records(&self, query: &RecordListQuery) -> RepoResult<Vec<VaccinationRecord>>;
    fn delete_record(&self, id: RecordId) -> RepoResult<()>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn create_record(&self, draft: &RecordDraft) -> RepoResult<RecordWrite> {
        let record = VaccinationRecord::from_draft(Uuid::new_v4(), draft);
        record.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let resolved = resolve_record_references(&tx, record.patient_id, record.vaccine_id)?;
        tx.execute(
            "INSERT INTO vaccination_records (
                id,
                patient_id,
                vaccine_id,
                dose,
                administered,
                next_due,
                status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                record.id.to_string(),
                record.patient_id.to_string(),
                record.vaccine_id.to_string(),
                record.dose,
                format_date(record.administered),
                record.next_due.map(format_date),
                record.status.as_str(),
            ],
        )?;
        tx.commit()?;

        let advisory = dose_advisory(record.dose, resolved.series_doses);
        Ok(RecordWrite { record, advisory })
    }

    fn update_record(&self, id: RecordId, patch: &RecordPatch) -> RepoResult<RecordWrite> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut record = load_record(&tx, id)?.ok_or(RepoError::NotFound {
            kind: EntityKind::Record,
            id,
        })?;
        record.apply(patch);
        record.validate()?;
        let resolved = resolve_record_references(&tx, record.patient_id, record.vaccine_id)?;

        tx.execute(
            "UPDATE vaccination_records
             SET
                patient_id = ?2,
                vaccine_id = ?3,
                dose = ?4,
                administered = ?5,
                next_due = ?6,
                status = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                id.to_string(),
                record.patient_id.to_string(),
                record.vaccine_id.to_string(),
                record.dose,
                format_date(record.administered),
                record.next_due.map(format_date),
                record.status.as_str(),
            ],
        )?;
        tx.commit()?;

        let advisory = dose_advisory(record.dose, resolved.series_doses);
        Ok(RecordWrite { record, advisory })
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<VaccinationRecord>> {
        load_record(self.conn, id)
    }

    fn list_records(&self, query: &RecordListQuery) -> RepoResult<Vec<VaccinationRecord>> {
        let mut sql = format!("{RECORD_SELECT_SQL} WHERE 1 = 1");
        let bind_values = push_record_filters(&mut sql, query, "");
        sql.push_str(" ORDER BY seq ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }
        Ok(records)
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM vaccination_records WHERE id = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Record,
                id,
            });
        }
        Ok(())
    }
}

fn load_record(conn: &Connection, id: RecordId) -> RepoResult<Option<VaccinationRecord>> {
    let mut stmt = conn.prepare(&format!("{RECORD_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_record_row(row)?));
    }
    Ok(None)
}

/// Appends `AND ...` filter clauses for `query` and returns their bind values.
///
/// `column_prefix` qualifies columns in joined queries (e.g. `"r."`).
pub(crate) fn push_record_filters(
    sql: &mut String,
    query: &RecordListQuery,
    column_prefix: &str,
) -> Vec<Value> {
    let mut bind_values = Vec::new();
    if let Some(patient_id) = query.patient_id {
        sql.push_str(&format!(" AND {column_prefix}patient_id = ?"));
        bind_values.push(Value::Text(patient_id.to_string()));
    }
    if let Some(vaccine_id) = query.vaccine_id {
        sql.push_str(&format!(" AND {column_prefix}vaccine_id = ?"));
        bind_values.push(Value::Text(vaccine_id.to_string()));
    }
    if let Some(status) = query.status {
        sql.push_str(&format!(" AND {column_prefix}status = ?"));
        bind_values.push(Value::Text(status.as_str().to_string()));
    }
    bind_values
}

/// Parses record columns by name; joined queries must alias them accordingly.
pub(crate) fn parse_record_row(row: &Row<'_>) -> RepoResult<VaccinationRecord> {
    let id_text: String = row.get("id")?;
    let patient_text: String = row.get("patient_id")?;
    let vaccine_text: String = row.get("vaccine_id")?;
    let administered_text: String = row.get("administered")?;
    let next_due = row
        .get::<_, Option<String>>("next_due")?
        .map(|value| parse_date(&value, "vaccination_records.next_due"))
        .transpose()?;
    let status_text: String = row.get("status")?;
    let status = status_text.parse::<RecordStatus>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in vaccination_records.status"
        ))
    })?;

    let record = VaccinationRecord {
        id: parse_uuid(&id_text, "vaccination_records.id")?,
        patient_id: parse_uuid(&patient_text, "vaccination_records.patient_id")?,
        vaccine_id: parse_uuid(&vaccine_text, "vaccination_records.vaccine_id")?,
        dose: row.get("dose")?,
        administered: parse_date(&administered_text, "vaccination_records.administered")?,
        next_due,
        status,
    };
    record.validate()?;
    Ok(record)
}
