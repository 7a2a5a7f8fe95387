//! Write-time validation errors shared by all entities.

use crate::model::EntityKind;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection reason for a malformed or incomplete entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty after trimming.
    BlankField {
        entity: EntityKind,
        field: &'static str,
    },
    /// Count field must be at least 1.
    NonPositive {
        entity: EntityKind,
        field: &'static str,
    },
    /// Patient birth date lies after the current date.
    BirthDateInFuture {
        date_of_birth: NaiveDate,
        today: NaiveDate,
    },
    /// Record next-due date precedes its administration date.
    NextDueBeforeAdministered {
        administered: NaiveDate,
        next_due: NaiveDate,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField { entity, field } => {
                write!(f, "{entity} field `{field}` must not be blank")
            }
            Self::NonPositive { entity, field } => {
                write!(f, "{entity} field `{field}` must be a positive integer")
            }
            Self::BirthDateInFuture {
                date_of_birth,
                today,
            } => write!(
                f,
                "date of birth {date_of_birth} is in the future (today is {today})"
            ),
            Self::NextDueBeforeAdministered {
                administered,
                next_due,
            } => write!(
                f,
                "next due date {next_due} precedes administered date {administered}"
            ),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_non_blank(
    entity: EntityKind,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField { entity, field });
    }
    Ok(())
}

pub(crate) fn require_positive(
    entity: EntityKind,
    field: &'static str,
    value: u32,
) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::NonPositive { entity, field });
    }
    Ok(())
}
