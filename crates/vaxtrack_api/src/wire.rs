//! Request payloads and their conversion into core drafts and patches.
//!
//! # Responsibility
//! - Accept what browser forms actually submit: numeric strings for counts,
//!   `""` or `null` for unset ids, dates and labels.
//! - Keep one payload per collection for both POST (draft) and PUT (patch).
//!
//! # Invariants
//! - A field absent from a PUT body leaves the stored value unchanged.
//! - `nextDue: null` or `nextDue: ""` on PUT clears the stored date.
//! - Semantic checks stay in core; this module only parses shapes.

use crate::error::ApiError;
use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;
use vaxtrack_core::{
    Gender, PatientDraft, PatientPatch, RecordDraft, RecordListQuery, RecordPatch, RecordStatus,
    VaccineDraft, VaccinePatch,
};

/// `POST/PUT /vaccines` body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinePayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub recommended_age: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub doses: Option<u32>,
    #[serde(default)]
    pub interval: Option<String>,
}

impl VaccinePayload {
    /// Missing `doses` becomes 0 and is rejected by core validation.
    pub fn into_draft(self) -> VaccineDraft {
        VaccineDraft {
            name: self.name.unwrap_or_default(),
            recommended_age: self.recommended_age.unwrap_or_default(),
            doses: self.doses.unwrap_or(0),
            interval: self.interval.unwrap_or_default(),
        }
    }

    pub fn into_patch(self) -> VaccinePatch {
        VaccinePatch {
            name: self.name,
            recommended_age: self.recommended_age,
            doses: self.doses,
            interval: self.interval,
        }
    }
}

/// `POST/PUT /patients` body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub guardian: Option<String>,
}

impl PatientPayload {
    pub fn into_draft(self) -> Result<PatientDraft, ApiError> {
        Ok(PatientDraft {
            name: self.name.unwrap_or_default(),
            date_of_birth: required(self.date_of_birth, "dateOfBirth")?,
            gender: required(self.gender, "gender")?,
            guardian: self.guardian.unwrap_or_default(),
        })
    }

    pub fn into_patch(self) -> PatientPatch {
        PatientPatch {
            name: self.name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            guardian: self.guardian,
        }
    }
}

/// `POST/PUT /records` body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPayload {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub patient_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub vaccine_id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub dose: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub administered: Option<NaiveDate>,
    /// Outer `None`: field absent. `Some(None)`: explicitly unset.
    #[serde(default, deserialize_with = "clearable_date")]
    pub next_due: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<RecordStatus>,
}

impl RecordPayload {
    pub fn into_draft(self) -> Result<RecordDraft, ApiError> {
        Ok(RecordDraft {
            patient_id: required(self.patient_id, "patientId")?,
            vaccine_id: required(self.vaccine_id, "vaccineId")?,
            dose: self.dose.unwrap_or(0),
            administered: required(self.administered, "administered")?,
            next_due: self.next_due.flatten(),
            status: required(self.status, "status")?,
        })
    }

    pub fn into_patch(self) -> RecordPatch {
        RecordPatch {
            patient_id: self.patient_id,
            vaccine_id: self.vaccine_id,
            dose: self.dose,
            administered: self.administered,
            next_due: self.next_due,
            status: self.status,
        }
    }
}

/// `GET /records` query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub patient_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub vaccine_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<RecordStatus>,
}

impl From<RecordFilter> for RecordListQuery {
    fn from(filter: RecordFilter) -> Self {
        Self {
            patient_id: filter.patient_id,
            vaccine_id: filter.vaccine_id,
            status: filter.status,
        }
    }
}

/// Parses a path id; text that is not a UUID cannot name a stored entity.
pub fn parse_path_id(raw: &str, kind: &'static str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::NotFound(format!("{kind} not found: {raw}")))
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::BadRequest(format!("missing required field `{field}`")))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(value)) => u32::try_from(value)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("count `{value}` is out of range"))),
        Some(NumberOrText::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<u32>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected a whole number, got `{trimmed}`")))
        }
    }
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) if !text.trim().is_empty() => {
            text.trim().parse::<T>().map(Some).map_err(D::Error::custom)
        }
        _ => Ok(None),
    }
}

fn clearable_date<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    blank_as_none(deserializer).map(Some)
}
