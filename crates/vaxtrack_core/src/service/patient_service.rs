//! Patient use-case service.

use crate::model::patient::{Patient, PatientDraft, PatientPatch};
use crate::model::{EntityKind, PatientId};
use crate::repo::patient_repo::PatientRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::{log_delete, log_write};

/// Use-case service wrapper for patient CRUD operations.
pub struct PatientService<R: PatientRepository> {
    repo: R,
}

impl<R: PatientRepository> PatientService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_patient(&self, draft: &PatientDraft) -> RepoResult<Patient> {
        let result = self.repo.create_patient(draft);
        log_write(EntityKind::Patient, "create", result.as_ref().map(|p| p.id));
        result
    }

    pub fn update_patient(&self, id: PatientId, patch: &PatientPatch) -> RepoResult<Patient> {
        let result = self.repo.update_patient(id, patch);
        log_write(EntityKind::Patient, "update", result.as_ref().map(|p| p.id));
        result
    }

    pub fn get_patient(&self, id: PatientId) -> RepoResult<Patient> {
        self.repo.get_patient(id)?.ok_or(RepoError::NotFound {
            kind: EntityKind::Patient,
            id,
        })
    }

    pub fn list_patients(&self) -> RepoResult<Vec<Patient>> {
        self.repo.list_patients()
    }

    pub fn delete_patient(&self, id: PatientId) -> RepoResult<()> {
        let result = self.repo.delete_patient(id);
        log_delete(EntityKind::Patient, id, result.as_ref().map(|_| ()));
        result
    }
}
