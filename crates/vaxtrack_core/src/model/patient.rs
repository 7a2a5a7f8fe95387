//! Patient registration model.
//!
//! # Invariants
//! - `name` and `guardian` are non-blank and stored trimmed.
//! - `date_of_birth` is not after the validation date.

use crate::model::validation::{require_non_blank, ValidationError};
use crate::model::{EntityKind, PatientId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Self::Male, Self::Female, Self::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

/// Error returned when a gender label is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGender(pub String);

impl Display for UnknownGender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown gender `{}`; expected Male|Female|Other", self.0)
    }
}

impl Error for UnknownGender {}

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|gender| gender.as_str() == value)
            .ok_or_else(|| UnknownGender(value.to_string()))
    }
}

/// Registered patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub guardian: String,
}

/// Input for registering a patient; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientDraft {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub guardian: String,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatientPatch {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub guardian: Option<String>,
}

impl Patient {
    pub fn from_draft(id: PatientId, draft: &PatientDraft) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            date_of_birth: draft.date_of_birth,
            gender: draft.gender,
            guardian: draft.guardian.trim().to_string(),
        }
    }

    /// Merges present patch fields into this patient.
    pub fn apply(&mut self, patch: &PatientPatch) {
        if let Some(name) = patch.name.as_deref() {
            self.name = name.trim().to_string();
        }
        if let Some(date_of_birth) = patch.date_of_birth {
            self.date_of_birth = date_of_birth;
        }
        if let Some(gender) = patch.gender {
            self.gender = gender;
        }
        if let Some(guardian) = patch.guardian.as_deref() {
            self.guardian = guardian.trim().to_string();
        }
    }

    /// Validates required fields against the given current date.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        require_non_blank(EntityKind::Patient, "name", &self.name)?;
        require_non_blank(EntityKind::Patient, "guardian", &self.guardian)?;
        if self.date_of_birth > today {
            return Err(ValidationError::BirthDateInFuture {
                date_of_birth: self.date_of_birth,
                today,
            });
        }
        Ok(())
    }
}
