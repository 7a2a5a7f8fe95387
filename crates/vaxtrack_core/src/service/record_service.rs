//! Vaccination record use-case service.
//!
//! # Responsibility
//! - Provide CRUD entry points for records.
//! - Surface dose advisories as warnings without rejecting the write.
//!
//! # Invariants
//! - Status values pass through unchanged; this service never derives them.

use crate::model::record::{RecordDraft, RecordPatch, VaccinationRecord};
use crate::model::{EntityKind, RecordId};
use crate::repo::record_repo::{RecordListQuery, RecordRepository, RecordWrite};
use crate::repo::{RepoError, RepoResult};
use crate::service::{log_delete, log_write};
use log::warn;

/// Use-case service wrapper for vaccination record CRUD operations.
pub struct RecordService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> RecordService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a record once both references resolve.
    pub fn create_record(&self, draft: &RecordDraft) -> RepoResult<RecordWrite> {
        let result = self.repo.create_record(draft);
        log_write(
            EntityKind::Record,
            "create",
            result.as_ref().map(|write| write.record.id),
        );
        if let Ok(write) = &result {
            warn_on_advisory(write);
        }
        result
    }

    /// Merges a patch into a record; changed references are re-resolved.
    pub fn update_record(&self, id: RecordId, patch: &RecordPatch) -> RepoResult<RecordWrite> {
        let result = self.repo.update_record(id, patch);
        log_write(
            EntityKind::Record,
            "update",
            result.as_ref().map(|write| write.record.id),
        );
        if let Ok(write) = &result {
            warn_on_advisory(write);
        }
        result
    }

    pub fn get_record(&self, id: RecordId) -> RepoResult<VaccinationRecord> {
        self.repo.get_record(id)?.ok_or(RepoError::NotFound {
            kind: EntityKind::Record,
            id,
        })
    }

    pub fn list_records(&self, query: &RecordListQuery) -> RepoResult<Vec<VaccinationRecord>> {
        self.repo.list_records(query)
    }

    pub fn delete_record(&self, id: RecordId) -> RepoResult<()> {
        let result = self.repo.delete_record(id);
        log_delete(EntityKind::Record, id, result.as_ref().map(|_| ()));
        result
    }
}

fn warn_on_advisory(write: &RecordWrite) {
    if let Some(advisory) = write.advisory {
        warn!(
            "event=record_write module=service status=dose_exceeds_series id={} dose={} series_doses={}",
            write.record.id, advisory.dose, advisory.series_doses
        );
    }
}
