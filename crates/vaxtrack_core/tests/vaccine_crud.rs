use uuid::Uuid;
use vaxtrack_core::db::open_db_in_memory;
use vaxtrack_core::{
    EntityKind, RepoError, SqliteVaccineRepository, ValidationError, VaccineDraft, VaccinePatch,
    VaccineRepository, VaccineService,
};

fn mmr_draft() -> VaccineDraft {
    VaccineDraft {
        name: "MMR".to_string(),
        recommended_age: "12 months".to_string(),
        doses: 2,
        interval: "4 weeks".to_string(),
    }
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteVaccineRepository::try_new(&conn).unwrap();

    let created = repo.create_vaccine(&mmr_draft()).unwrap();
    let loaded = repo.get_vaccine(created.id).unwrap().unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.name, "MMR");
    assert_eq!(loaded.recommended_age, "12 months");
    assert_eq!(loaded.doses, 2);
    assert_eq!(loaded.interval, "4 weeks");
}

#[test]
fn create_trims_text_fields_and_allows_empty_free_text() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteVaccineRepository::try_new(&conn).unwrap();

    let created = repo
        .create_vaccine(&VaccineDraft {
            name: "  BCG  ".to_string(),
            doses: 1,
            ..VaccineDraft::default()
        })
        .unwrap();

    assert_eq!(created.name, "BCG");
    assert_eq!(created.recommended_age, "");
    assert_eq!(created.interval, "");
}

#[test]
fn create_assigns_distinct_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteVaccineRepository::try_new(&conn).unwrap();

    let first = repo.create_vaccine(&mmr_draft()).unwrap();
    let second = repo
        .create_vaccine(&VaccineDraft {
            name: "Polio".to_string(),
            ..mmr_draft()
        })
        .unwrap();

    assert_ne!(first.id, second.id);
}

#[test]
fn list_returns_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteVaccineRepository::try_new(&conn).unwrap();

    for name in ["Polio", "BCG", "MMR"] {
        repo.create_vaccine(&VaccineDraft {
            name: name.to_string(),
            ..mmr_draft()
        })
        .unwrap();
    }

    let names = repo
        .list_vaccines()
        .unwrap()
        .into_iter()
        .map(|vaccine| vaccine.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Polio", "BCG", "MMR"]);
}

#[test]
fn create_rejects_blank_name_and_zero_doses() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteVaccineRepository::try_new(&conn).unwrap();

    let blank = repo
        .create_vaccine(&VaccineDraft {
            name: "   ".to_string(),
            ..mmr_draft()
        })
        .unwrap_err();
    assert!(matches!(
        blank,
        RepoError::Validation(ValidationError::BlankField {
            entity: EntityKind::Vaccine,
            field: "name"
        })
    ));

    let zero = repo
        .create_vaccine(&VaccineDraft {
            doses: 0,
            ..mmr_draft()
        })
        .unwrap_err();
    assert!(matches!(
        zero,
        RepoError::Validation(ValidationError::NonPositive {
            entity: EntityKind::Vaccine,
            field: "doses"
        })
    ));

    assert!(repo.list_vaccines().unwrap().is_empty());
}

#[test]
fn create_rejects_duplicate_name_ignoring_case() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteVaccineRepository::try_new(&conn).unwrap();
    repo.create_vaccine(&mmr_draft()).unwrap();

    let err = repo
        .create_vaccine(&VaccineDraft {
            name: "mmr".to_string(),
            ..mmr_draft()
        })
        .unwrap_err();

    assert!(matches!(err, RepoError::DuplicateName(name) if name == "mmr"));
    assert_eq!(repo.list_vaccines().unwrap().len(), 1);
}

#[test]
fn update_merges_only_present_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteVaccineRepository::try_new(&conn).unwrap();
    let created = repo.create_vaccine(&mmr_draft()).unwrap();

    let updated = repo
        .update_vaccine(
            created.id,
            &VaccinePatch {
                doses: Some(3),
                ..VaccinePatch::default()
            },
        )
        .unwrap();

    assert_eq!(updated.doses, 3);
    assert_eq!(updated.name, "MMR");
    assert_eq!(updated.recommended_age, "12 months");
    assert_eq!(repo.get_vaccine(created.id).unwrap().unwrap(), updated);
}

#[test]
fn update_may_keep_own_name_with_different_case() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteVaccineRepository::try_new(&conn).unwrap();
    let created = repo.create_vaccine(&mmr_draft()).unwrap();

    let updated = repo
        .update_vaccine(
            created.id,
            &VaccinePatch {
                name: Some("mmr".to_string()),
                ..VaccinePatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name, "mmr");
}

#[test]
fn update_rejects_name_taken_by_another_vaccine() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteVaccineRepository::try_new(&conn).unwrap();
    repo.create_vaccine(&mmr_draft()).unwrap();
    let polio = repo
        .create_vaccine(&VaccineDraft {
            name: "Polio".to_string(),
            ..mmr_draft()
        })
        .unwrap();

    let err = repo
        .update_vaccine(
            polio.id,
            &VaccinePatch {
                name: Some("MMR".to_string()),
                ..VaccinePatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateName(_)));
    assert_eq!(repo.get_vaccine(polio.id).unwrap().unwrap().name, "Polio");
}

#[test]
fn update_invalid_patch_leaves_stored_entity_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteVaccineRepository::try_new(&conn).unwrap();
    let created = repo.create_vaccine(&mmr_draft()).unwrap();

    let err = repo
        .update_vaccine(
            created.id,
            &VaccinePatch {
                doses: Some(0),
                ..VaccinePatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.get_vaccine(created.id).unwrap().unwrap(), created);
}

#[test]
fn update_and_delete_unknown_id_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteVaccineRepository::try_new(&conn).unwrap();
    let missing = Uuid::new_v4();

    let update_err = repo
        .update_vaccine(missing, &VaccinePatch::default())
        .unwrap_err();
    assert!(matches!(
        update_err,
        RepoError::NotFound { kind: EntityKind::Vaccine, id } if id == missing
    ));

    let delete_err = repo.delete_vaccine(missing).unwrap_err();
    assert!(matches!(delete_err, RepoError::NotFound { .. }));
}

#[test]
fn delete_unreferenced_vaccine_removes_it_from_list() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteVaccineRepository::try_new(&conn).unwrap();
    let created = repo.create_vaccine(&mmr_draft()).unwrap();

    repo.delete_vaccine(created.id).unwrap();

    assert!(repo.get_vaccine(created.id).unwrap().is_none());
    assert!(repo.list_vaccines().unwrap().is_empty());
}

#[test]
fn service_get_maps_missing_vaccine_to_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = VaccineService::new(SqliteVaccineRepository::try_new(&conn).unwrap());
    let created = service.create_vaccine(&mmr_draft()).unwrap();

    assert_eq!(service.get_vaccine(created.id).unwrap(), created);
    let err = service.get_vaccine(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let err = SqliteVaccineRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}
