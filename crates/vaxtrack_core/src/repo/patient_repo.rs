//! Patient repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Birth dates are validated against the repository's notion of today.
//! - A patient referenced by any record cannot be deleted.

use crate::model::lifecycle::today_utc;
use crate::model::patient::{Gender, Patient, PatientDraft, PatientPatch};
use crate::model::{EntityKind, PatientId};
use crate::repo::guard::ensure_no_dependents;
use crate::repo::{
    ensure_connection_ready, format_date, parse_date, parse_uuid, RepoError, RepoResult,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const PATIENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    date_of_birth,
    gender,
    guardian
FROM patients";

/// Repository interface for patient registrations.
pub trait PatientRepository {
    fn create_patient(&self, draft: &PatientDraft) -> RepoResult<Patient>;
    fn update_patient(&self, id: PatientId, patch: &PatientPatch) -> RepoResult<Patient>;
    fn get_patient(&self, id: PatientId) -> RepoResult<Option<Patient>>;
    /// Lists all patients in insertion order.
    fn list_patients(&self) -> RepoResult<Vec<Patient>>;
    /// Deletes a patient that no record references.
    fn delete_patient(&self, id: PatientId) -> RepoResult<()>;
}

/// SQLite-backed patient repository.
pub struct SqlitePatientRepository<'conn> {
    conn: &'conn Connection,
    today: fn() -> NaiveDate,
}

impl<'conn> SqlitePatientRepository<'conn> {
    /// Creates repository from a migrated connection, validating birth dates
    /// against the current UTC date.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::with_clock(conn, today_utc)
    }

    /// Creates repository with an explicit date source.
    pub fn with_clock(conn: &'conn Connection, today: fn() -> NaiveDate) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn, today })
    }
}

impl PatientRepository for SqlitePatientRepository<'_> {
    fn create_patient(&self, draft: &PatientDraft) -> RepoResult<Patient> {
        let patient = Patient::from_draft(Uuid::new_v4(), draft);
        patient.validate((self.today)())?;

        self.conn.execute(
            "INSERT INTO patients (
                id,
                name,
                date_of_birth,
                gender,
                guardian
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                patient.id.to_string(),
                patient.name.as_str(),
                format_date(patient.date_of_birth),
                patient.gender.as_str(),
                patient.guardian.as_str(),
            ],
        )?;

        Ok(patient)
    }

    fn update_patient(&self, id: PatientId, patch: &PatientPatch) -> RepoResult<Patient> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut patient = load_patient(&tx, id)?.ok_or(RepoError::NotFound {
            kind: EntityKind::Patient,
            id,
        })?;
        patient.apply(patch);
        patient.validate((self.today)())?;

        tx.execute(
            "UPDATE patients
             SET
                name = ?2,
                date_of_birth = ?3,
                gender = ?4,
                guardian = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                id.to_string(),
                patient.name.as_str(),
                format_date(patient.date_of_birth),
                patient.gender.as_str(),
                patient.guardian.as_str(),
            ],
        )?;
        tx.commit()?;

        Ok(patient)
    }

    fn get_patient(&self, id: PatientId) -> RepoResult<Option<Patient>> {
        load_patient(self.conn, id)
    }

    fn list_patients(&self) -> RepoResult<Vec<Patient>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PATIENT_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut patients = Vec::new();
        while let Some(row) = rows.next()? {
            patients.push(parse_patient_row(row)?);
        }
        Ok(patients)
    }

    fn delete_patient(&self, id: PatientId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if load_patient(&tx, id)?.is_none() {
            return Err(RepoError::NotFound {
                kind: EntityKind::Patient,
                id,
            });
        }
        ensure_no_dependents(&tx, EntityKind::Patient, id)?;
        tx.execute("DELETE FROM patients WHERE id = ?1;", [id.to_string()])?;
        tx.commit()?;
        Ok(())
    }
}

fn load_patient(conn: &Connection, id: PatientId) -> RepoResult<Option<Patient>> {
    let mut stmt = conn.prepare(&format!("{PATIENT_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_patient_row(row)?));
    }
    Ok(None)
}

// Read paths skip the future-birth-date check: "today" moves, stored rows don't.
fn parse_patient_row(row: &Row<'_>) -> RepoResult<Patient> {
    let id_text: String = row.get("id")?;
    let dob_text: String = row.get("date_of_birth")?;
    let gender_text: String = row.get("gender")?;
    let gender = gender_text.parse::<Gender>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid gender `{gender_text}` in patients.gender"
        ))
    })?;

    Ok(Patient {
        id: parse_uuid(&id_text, "patients.id")?,
        name: row.get("name")?,
        date_of_birth: parse_date(&dob_text, "patients.date_of_birth")?,
        gender,
        guardian: row.get("guardian")?,
    })
}
