//! Vaccine use-case service.
//!
//! # Responsibility
//! - Provide CRUD entry points for vaccine definitions.
//! - Emit write/delete events for diagnostics.

use crate::model::vaccine::{Vaccine, VaccineDraft, VaccinePatch};
use crate::model::{EntityKind, VaccineId};
use crate::repo::vaccine_repo::VaccineRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::{log_delete, log_write};

/// Use-case service wrapper for vaccine CRUD operations.
pub struct VaccineService<R: VaccineRepository> {
    repo: R,
}

impl<R: VaccineRepository> VaccineService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_vaccine(&self, draft: &VaccineDraft) -> RepoResult<Vaccine> {
        let result = self.repo.create_vaccine(draft);
        log_write(EntityKind::Vaccine, "create", result.as_ref().map(|v| v.id));
        result
    }

    pub fn update_vaccine(&self, id: VaccineId, patch: &VaccinePatch) -> RepoResult<Vaccine> {
        let result = self.repo.update_vaccine(id, patch);
        log_write(EntityKind::Vaccine, "update", result.as_ref().map(|v| v.id));
        result
    }

    /// Gets one vaccine, failing with `NotFound` when absent.
    pub fn get_vaccine(&self, id: VaccineId) -> RepoResult<Vaccine> {
        self.repo.get_vaccine(id)?.ok_or(RepoError::NotFound {
            kind: EntityKind::Vaccine,
            id,
        })
    }

    pub fn list_vaccines(&self) -> RepoResult<Vec<Vaccine>> {
        self.repo.list_vaccines()
    }

    /// Deletes a vaccine; rejected while any record references it.
    pub fn delete_vaccine(&self, id: VaccineId) -> RepoResult<()> {
        let result = self.repo.delete_vaccine(id);
        log_delete(EntityKind::Vaccine, id, result.as_ref().map(|_| ()));
        result
    }
}
