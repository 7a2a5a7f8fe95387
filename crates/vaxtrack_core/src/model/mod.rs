//! Domain model for vaccines, patients and vaccination records.
//!
//! # Responsibility
//! - Define canonical entity shapes shared by storage, services and the API.
//! - Own write-time validation rules for every entity.
//!
//! # Invariants
//! - Every entity is identified by a server-assigned UUID v4 that is never
//!   reused.
//! - A vaccination record references exactly one patient and one vaccine;
//!   patients and vaccines never reference each other.

use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod lifecycle;
pub mod patient;
pub mod record;
pub mod vaccine;
pub mod validation;

/// Stable identifier for every stored entity.
pub type EntityId = Uuid;
pub type VaccineId = EntityId;
pub type PatientId = EntityId;
pub type RecordId = EntityId;

/// Entity collections known by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Vaccine,
    Patient,
    Record,
}

impl EntityKind {
    /// Lowercase label used in log events and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vaccine => "vaccine",
            Self::Patient => "patient",
            Self::Record => "record",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
