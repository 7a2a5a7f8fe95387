//! Vaccine repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Vaccine names are unique ignoring ASCII case.
//! - A vaccine referenced by any record cannot be deleted.

use crate::model::vaccine::{Vaccine, VaccineDraft, VaccinePatch};
use crate::model::{EntityKind, VaccineId};
use crate::repo::guard::ensure_no_dependents;
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const VACCINE_SELECT_SQL: &str = "SELECT
    id,
    name,
    recommended_age,
    doses,
    dose_interval
FROM vaccines";

/// Repository interface for vaccine definitions.
pub trait VaccineRepository {
    /// Assigns an id, validates and persists one vaccine.
    fn create_vaccine(&self, draft: &VaccineDraft) -> RepoResult<Vaccine>;
    /// Merges a patch into an existing vaccine and persists the result.
    fn update_vaccine(&self, id: VaccineId, patch: &VaccinePatch) -> RepoResult<Vaccine>;
    fn get_vaccine(&self, id: VaccineId) -> RepoResult<Option<Vaccine>>;
    /// Lists all vaccines in insertion order.
    fn list_vaccines(&self) -> RepoResult<Vec<Vaccine>>;
    /// Deletes a vaccine that no record references.
    fn delete_vaccine(&self, id: VaccineId) -> RepoResult<()>;
}

/// SQLite-backed vaccine repository.
pub struct SqliteVaccineRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteVaccineRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl VaccineRepository for SqliteVaccineRepository<'_> {
    fn create_vaccine(&self, draft: &VaccineDraft) -> RepoResult<Vaccine> {
        let vaccine = Vaccine::from_draft(Uuid::new_v4(), draft);
        vaccine.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_name_available(&tx, &vaccine.name, None)?;
        tx.execute(
            "INSERT INTO vaccines (
                id,
                name,
                recommended_age,
                doses,
                dose_interval
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                vaccine.id.to_string(),
                vaccine.name.as_str(),
                vaccine.recommended_age.as_str(),
                vaccine.doses,
                vaccine.interval.as_str(),
            ],
        )?;
        tx.commit()?;

        Ok(vaccine)
    }

    fn update_vaccine(&self, id: VaccineId, patch: &VaccinePatch) -> RepoResult<Vaccine> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut vaccine = load_vaccine(&tx, id)?.ok_or(RepoError::NotFound {
            kind: EntityKind::Vaccine,
            id,
        })?;
        vaccine.apply(patch);
        vaccine.validate()?;
        ensure_name_available(&tx, &vaccine.name, Some(id))?;

        tx.execute(
            "UPDATE vaccines
             SET
                name = ?2,
                recommended_age = ?3,
                doses = ?4,
                dose_interval = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                id.to_string(),
                vaccine.name.as_str(),
                vaccine.recommended_age.as_str(),
                vaccine.doses,
                vaccine.interval.as_str(),
            ],
        )?;
        tx.commit()?;

        Ok(vaccine)
    }

    fn get_vaccine(&self, id: VaccineId) -> RepoResult<Option<Vaccine>> {
        load_vaccine(self.conn, id)
    }

    fn list_vaccines(&self) -> RepoResult<Vec<Vaccine>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{VACCINE_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut vaccines = Vec::new();
        while let Some(row) = rows.next()? {
            vaccines.push(parse_vaccine_row(row)?);
        }
        Ok(vaccines)
    }

    fn delete_vaccine(&self, id: VaccineId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if load_vaccine(&tx, id)?.is_none() {
            return Err(RepoError::NotFound {
                kind: EntityKind::Vaccine,
                id,
            });
        }
        ensure_no_dependents(&tx, EntityKind::Vaccine, id)?;
        tx.execute("DELETE FROM vaccines WHERE id = ?1;", [id.to_string()])?;
        tx.commit()?;
        Ok(())
    }
}

fn load_vaccine(conn: &Connection, id: VaccineId) -> RepoResult<Option<Vaccine>> {
    let mut stmt = conn.prepare(&format!("{VACCINE_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_vaccine_row(row)?));
    }
    Ok(None)
}

fn ensure_name_available(
    conn: &Connection,
    name: &str,
    exclude: Option<VaccineId>,
) -> RepoResult<()> {
    let holder: Option<String> = conn
        .query_row(
            "SELECT id FROM vaccines WHERE name = ?1 COLLATE NOCASE;",
            [name],
            |row| row.get(0),
        )
        .optional()?;

    match holder {
        Some(holder) if exclude.map_or(true, |id| holder != id.to_string()) => {
            Err(RepoError::DuplicateName(name.to_string()))
        }
        _ => Ok(()),
    }
}

fn parse_vaccine_row(row: &Row<'_>) -> RepoResult<Vaccine> {
    let id_text: String = row.get("id")?;
    let vaccine = Vaccine {
        id: parse_uuid(&id_text, "vaccines.id")?,
        name: row.get("name")?,
        recommended_age: row.get("recommended_age")?,
        doses: row.get("doses")?,
        interval: row.get("dose_interval")?,
    };
    vaccine.validate()?;
    Ok(vaccine)
}
