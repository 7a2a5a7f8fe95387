//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep HTTP/CLI layers decoupled from storage details.
//!
//! # Invariants
//! - Service APIs never bypass repository validation or integrity checks.

use crate::model::{EntityId, EntityKind};
use crate::repo::RepoError;
use log::{info, warn};

pub mod patient_service;
pub mod record_service;
pub mod vaccine_service;

fn log_write(kind: EntityKind, action: &'static str, outcome: Result<EntityId, &RepoError>) {
    match outcome {
        Ok(id) => info!("event=entity_{action} module=service status=ok kind={kind} id={id}"),
        Err(err) => warn!(
            "event=entity_{action} module=service status=error kind={kind} error_code={} error={err}",
            error_code(err)
        ),
    }
}

fn log_delete(kind: EntityKind, id: EntityId, outcome: Result<(), &RepoError>) {
    match outcome {
        Ok(()) => info!("event=entity_delete module=service status=ok kind={kind} id={id}"),
        Err(err) => warn!(
            "event=entity_delete module=service status=error kind={kind} id={id} error_code={} error={err}",
            error_code(err)
        ),
    }
}

/// Stable machine-readable code for each error class.
pub fn error_code(err: &RepoError) -> &'static str {
    match err {
        RepoError::Validation(_) => "validation_failed",
        RepoError::DuplicateName(_) => "duplicate_name",
        RepoError::NotFound { .. } => "not_found",
        RepoError::DanglingReference { .. } => "dangling_reference",
        RepoError::ReferentialConflict { .. } => "referential_conflict",
        RepoError::UninitializedConnection { .. } => "uninitialized_connection",
        RepoError::Db(_) => "db_error",
        RepoError::InvalidData(_) => "invalid_data",
    }
}
