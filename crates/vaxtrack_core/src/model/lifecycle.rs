//! Status and due-date lifecycle for vaccination records.
//!
//! # Responsibility
//! - Define the legal `status` labels of a record.
//! - Check the temporal relation between `administered` and `next_due`.
//! - Flag doses that run past the vaccine series length.
//!
//! # Invariants
//! - Status is operator-entered; nothing here derives it from dates.
//! - Any status may follow any other status on update.
//! - `next_due`, when set, is never earlier than `administered`.
//! - A dose beyond the series length is advisory only and never rejected.

use crate::model::validation::ValidationError;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Operator-assigned vaccination record status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    Completed,
    Due,
    Overdue,
}

impl RecordStatus {
    /// All statuses in display order.
    pub const ALL: [RecordStatus; 3] = [Self::Completed, Self::Due, Self::Overdue];

    /// Stable label used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Due => "Due",
            Self::Overdue => "Overdue",
        }
    }
}

impl Display for RecordStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status label is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl Display for UnknownStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown record status `{}`; expected Completed|Due|Overdue",
            self.0
        )
    }
}

impl Error for UnknownStatus {}

impl FromStr for RecordStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Checks that a next-due date does not precede the administration date.
pub fn check_due_window(
    administered: NaiveDate,
    next_due: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match next_due {
        Some(next_due) if next_due < administered => {
            Err(ValidationError::NextDueBeforeAdministered {
                administered,
                next_due,
            })
        }
        _ => Ok(()),
    }
}

/// Soft-constraint finding: a dose number beyond the vaccine series length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoseAdvisory {
    pub dose: u32,
    pub series_doses: u32,
}

impl Display for DoseAdvisory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "dose {} exceeds the {}-dose series",
            self.dose, self.series_doses
        )
    }
}

/// Returns an advisory when `dose` exceeds `series_doses`.
pub fn dose_advisory(dose: u32, series_doses: u32) -> Option<DoseAdvisory> {
    (dose > series_doses).then_some(DoseAdvisory { dose, series_doses })
}

/// Current calendar date in UTC, used for birth-date checks.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
