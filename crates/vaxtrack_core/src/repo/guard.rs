//! Referential integrity guard for vaccination records.
//!
//! # Responsibility
//! - Resolve a record's patient and vaccine references before it is written.
//! - Refuse patient/vaccine deletes while records still reference them.
//!
//! # Invariants
//! - Callers run these checks on the same open IMMEDIATE transaction as the
//!   write they protect, so check and act are one critical section.
//! - Deletes are rejected, never cascaded.

use crate::model::{EntityId, EntityKind, PatientId, VaccineId};
use crate::repo::{entity_exists, RepoError, RepoResult};
use rusqlite::{Connection, OptionalExtension};

/// Facts learned while resolving a record's references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedReferences {
    /// Series length of the referenced vaccine.
    pub series_doses: u32,
}

/// Checks that both record references point at existing entities.
///
/// The patient is checked first, so a record with two dangling references
/// reports the patient.
pub fn resolve_record_references(
    conn: &Connection,
    patient_id: PatientId,
    vaccine_id: VaccineId,
) -> RepoResult<ResolvedReferences> {
    if !entity_exists(conn, EntityKind::Patient, patient_id)? {
        return Err(RepoError::DanglingReference {
            kind: EntityKind::Patient,
            id: patient_id,
        });
    }

    let series_doses: Option<u32> = conn
        .query_row(
            "SELECT doses FROM vaccines WHERE id = ?1;",
            [vaccine_id.to_string()],
            |row| row.get(0),
        )
        .optional()?;

    match series_doses {
        Some(series_doses) => Ok(ResolvedReferences { series_doses }),
        None => Err(RepoError::DanglingReference {
            kind: EntityKind::Vaccine,
            id: vaccine_id,
        }),
    }
}

/// Counts vaccination records that reference the given entity.
///
/// Records themselves have no dependents.
pub fn count_dependents(conn: &Connection, kind: EntityKind, id: EntityId) -> RepoResult<u64> {
    let column = match kind {
        EntityKind::Patient => "patient_id",
        EntityKind::Vaccine => "vaccine_id",
        EntityKind::Record => return Ok(0),
    };
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM vaccination_records WHERE {column} = ?1;"),
        [id.to_string()],
        |row| row.get(0),
    )?;
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative dependent count `{count}`")))
}

/// Fails with `ReferentialConflict` when any record references the entity.
pub fn ensure_no_dependents(conn: &Connection, kind: EntityKind, id: EntityId) -> RepoResult<()> {
    let dependents = count_dependents(conn, kind, id)?;
    if dependents > 0 {
        return Err(RepoError::ReferentialConflict {
            kind,
            id,
            dependents,
        });
    }
    Ok(())
}
