//! Vaccination record model.
//!
//! # Invariants
//! - `dose` is at least 1.
//! - `next_due`, when set, is not before `administered`.
//! - Reference resolution is checked by the store, not here.

use crate::model::lifecycle::{check_due_window, RecordStatus};
use crate::model::validation::{require_positive, ValidationError};
use crate::model::{EntityKind, PatientId, RecordId, VaccineId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One administered (or scheduled) dose for one patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationRecord {
    pub id: RecordId,
    pub patient_id: PatientId,
    pub vaccine_id: VaccineId,
    /// Position of this dose in the series, starting at 1.
    pub dose: u32,
    pub administered: NaiveDate,
    #[serde(default)]
    pub next_due: Option<NaiveDate>,
    pub status: RecordStatus,
}

/// Input for creating a record; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    pub patient_id: PatientId,
    pub vaccine_id: VaccineId,
    pub dose: u32,
    pub administered: NaiveDate,
    pub next_due: Option<NaiveDate>,
    pub status: RecordStatus,
}

/// Partial update; `None` keeps the stored value.
///
/// `next_due` is doubly optional: `Some(None)` clears the date.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordPatch {
    pub patient_id: Option<PatientId>,
    pub vaccine_id: Option<VaccineId>,
    pub dose: Option<u32>,
    pub administered: Option<NaiveDate>,
    pub next_due: Option<Option<NaiveDate>>,
    pub status: Option<RecordStatus>,
}

impl VaccinationRecord {
    pub fn from_draft(id: RecordId, draft: &RecordDraft) -> Self {
        Self {
            id,
            patient_id: draft.patient_id,
            vaccine_id: draft.vaccine_id,
            dose: draft.dose,
            administered: draft.administered,
            next_due: draft.next_due,
            status: draft.status,
        }
    }

    /// Merges present patch fields into this record.
    pub fn apply(&mut self, patch: &RecordPatch) {
        if let Some(patient_id) = patch.patient_id {
            self.patient_id = patient_id;
        }
        if let Some(vaccine_id) = patch.vaccine_id {
            self.vaccine_id = vaccine_id;
        }
        if let Some(dose) = patch.dose {
            self.dose = dose;
        }
        if let Some(administered) = patch.administered {
            self.administered = administered;
        }
        if let Some(next_due) = patch.next_due {
            self.next_due = next_due;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive(EntityKind::Record, "dose", self.dose)?;
        check_due_window(self.administered, self.next_due)
    }
}
