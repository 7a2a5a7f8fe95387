//! Vaccine definition model.
//!
//! # Invariants
//! - `name` is non-blank and stored trimmed.
//! - `doses` is at least 1.
//! - `recommended_age` and `interval` are free text and may be empty.

use crate::model::validation::{require_non_blank, require_positive, ValidationError};
use crate::model::{EntityKind, VaccineId};
use serde::{Deserialize, Serialize};

/// Vaccine series definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vaccine {
    pub id: VaccineId,
    pub name: String,
    /// Free text such as "2 months".
    pub recommended_age: String,
    /// Total doses in the series.
    pub doses: u32,
    /// Free text spacing such as "4 weeks".
    pub interval: String,
}

/// Input for creating a vaccine; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VaccineDraft {
    pub name: String,
    pub recommended_age: String,
    pub doses: u32,
    pub interval: String,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VaccinePatch {
    pub name: Option<String>,
    pub recommended_age: Option<String>,
    pub doses: Option<u32>,
    pub interval: Option<String>,
}

impl Vaccine {
    /// Builds an entity from a draft under a caller-provided id.
    pub fn from_draft(id: VaccineId, draft: &VaccineDraft) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            recommended_age: draft.recommended_age.trim().to_string(),
            doses: draft.doses,
            interval: draft.interval.trim().to_string(),
        }
    }

    /// Merges present patch fields into this vaccine.
    pub fn apply(&mut self, patch: &VaccinePatch) {
        if let Some(name) = patch.name.as_deref() {
            self.name = name.trim().to_string();
        }
        if let Some(recommended_age) = patch.recommended_age.as_deref() {
            self.recommended_age = recommended_age.trim().to_string();
        }
        if let Some(doses) = patch.doses {
            self.doses = doses;
        }
        if let Some(interval) = patch.interval.as_deref() {
            self.interval = interval.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(EntityKind::Vaccine, "name", &self.name)?;
        require_positive(EntityKind::Vaccine, "doses", self.doses)?;
        Ok(())
    }
}
