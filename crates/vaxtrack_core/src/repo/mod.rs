//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define per-collection data access contracts.
//! - Isolate SQLite query details from service orchestration.
//! - Run integrity checks in the same transaction as the guarded write.
//!
//! # Invariants
//! - Write paths validate the merged entity before any SQL mutation.
//! - Repository APIs return semantic errors (`NotFound`, `DanglingReference`,
//!   `ReferentialConflict`) in addition to DB transport errors.
//! - Lists are returned in insertion order (`seq ASC`).

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::validation::ValidationError;
use crate::model::{EntityId, EntityKind};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod guard;
pub mod patient_repo;
pub mod record_repo;
pub mod vaccine_repo;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for persistence and integrity-checked write operations.
#[derive(Debug)]
pub enum RepoError {
    /// Entity failed write-time validation.
    Validation(ValidationError),
    /// Another vaccine already uses this name (case-insensitive).
    DuplicateName(String),
    /// Target entity does not exist.
    NotFound { kind: EntityKind, id: EntityId },
    /// Record points at a patient or vaccine that does not exist.
    DanglingReference { kind: EntityKind, id: EntityId },
    /// Delete blocked because records still reference the target.
    ReferentialConflict {
        kind: EntityKind,
        id: EntityId,
        dependents: u64,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    Db(DbError),
    /// Persisted data cannot be converted to a valid entity.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateName(name) => write!(f, "vaccine name already exists: `{name}`"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::DanglingReference { kind, id } => {
                write!(f, "record references missing {kind}: {id}")
            }
            Self::ReferentialConflict {
                kind,
                id,
                dependents,
            } => write!(
                f,
                "{kind} {id} is referenced by {dependents} vaccination record(s); delete or reassign them first"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn table_for(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Vaccine => "vaccines",
        EntityKind::Patient => "patients",
        EntityKind::Record => "vaccination_records",
    }
}

pub(crate) fn entity_exists(conn: &Connection, kind: EntityKind, id: EntityId) -> RepoResult<bool> {
    let found = conn
        .query_row(
            &format!("SELECT 1 FROM {} WHERE id = ?1;", table_for(kind)),
            [id.to_string()],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn parse_date(value: &str, column: &'static str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}

pub(crate) fn format_date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}
