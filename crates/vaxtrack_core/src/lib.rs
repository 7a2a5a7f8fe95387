//! Core domain logic for vaxtrack.
//! This crate is the single source of truth for vaccination record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::lifecycle::{DoseAdvisory, RecordStatus};
pub use model::patient::{Gender, Patient, PatientDraft, PatientPatch};
pub use model::record::{RecordDraft, RecordPatch, VaccinationRecord};
pub use model::vaccine::{Vaccine, VaccineDraft, VaccinePatch};
pub use model::validation::ValidationError;
pub use model::{EntityId, EntityKind, PatientId, RecordId, VaccineId};
pub use query::projection::{
    get_record_with_joins, list_records_with_joins, EntitySummary, RecordView,
};
pub use query::summary::{summarize, DashboardSummary, StatusCounts};
pub use repo::patient_repo::{PatientRepository, SqlitePatientRepository};
pub use repo::record_repo::{RecordListQuery, RecordRepository, RecordWrite, SqliteRecordRepository};
pub use repo::vaccine_repo::{SqliteVaccineRepository, VaccineRepository};
pub use repo::{RepoError, RepoResult};
pub use service::error_code;
pub use service::patient_service::PatientService;
pub use service::record_service::RecordService;
pub use service::vaccine_service::VaccineService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
