#![cfg(feature = "integration-tests")]

use chrono::NaiveDate;
use common::domain::{
    AdoptionStatus, AnimalRepository, Behavior, CreateAnimalRepoInput,
    CreateMedicalRecordRepoInput, CreatePhotoRepoInput, CreateVaccinationRepoInput,
    DeleteAnimalRepoInput, DeleteMedicalRecordRepoInput, DeletePhotoRepoInput, DomainError,
    Gender, GetMedicalRecordRepoInput, GetPhotoRepoInput, ListMedicalRecordsRepoInput,
    ListPhotosRepoInput, ListVaccinationsRepoInput, MedicalRecordRepository, MedicalRecordType,
    PhotoRepository, Species, SterilizationStatus, UpdateMedicalRecordRepoInput,
    UpdatePhotoRepoInput, VaccinationRepository, VaccinationStatus, VaccineName,
    select_display_photo,
};
use common::postgres::{
    MigrationRunner, PostgresAnimalRepository, PostgresClient, PostgresConfig,
    PostgresMedicalRecordRepository,
    PostgresPhotoRepository, PostgresVaccinationRepository,
};
use testcontainers::ContainerAsync;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;

struct Repos {
    animals: PostgresAnimalRepository,
    photos: PostgresPhotoRepository,
    medical: PostgresMedicalRecordRepository,
    vaccinations: PostgresVaccinationRepository,
}

async fn setup_test_db() -> (ContainerAsync<Postgres>, Repos, i64) {
    let postgres = Postgres::default().start().await.unwrap();
    let host = postgres.get_host().await.unwrap();
    let port = postgres.get_host_port_ipv4(5432).await.unwrap();

    let client = PostgresClient::new(&PostgresConfig {
        host: host.to_string(),
        port,
        database: "postgres".to_string(),
        max_pool_size: 5,
        ..Default::default()
    })
    .expect("Failed to create client");

    let runner = MigrationRunner::new(client.clone());
    assert_eq!(runner.run_migrations().await.unwrap(), 2);
    // Second run is a no-op
    assert_eq!(runner.run_migrations().await.unwrap(), 0);

    let repos = Repos {
        animals: PostgresAnimalRepository::new(client.clone()),
        photos: PostgresPhotoRepository::new(client.clone()),
        medical: PostgresMedicalRecordRepository::new(client.clone()),
        vaccinations: PostgresVaccinationRepository::new(client),
    };

    let animal = repos
        .animals
        .create_animal(CreateAnimalRepoInput {
            chip_id: "123456789012345".to_string(),
            name: "Rex".to_string(),
            species: Species::Dog,
            gender: Gender::Male,
            age_numeric: Some(2),
            age_category: None,
            injured: false,
            behavior: Behavior::Calm,
            vaccination_status: VaccinationStatus::Vaccine1,
            sterilization_status: SterilizationStatus::No,
            cage_number: 1,
            capture_location: "Market".to_string(),
            capture_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            finder_contact: String::new(),
            public_visibility: true,
            adoption_status: AdoptionStatus::Available,
            shelter: None,
            created_by: None,
        })
        .await
        .unwrap();

    (postgres, repos, animal.id)
}

fn photo_input(animal_id: i64, image: &str, is_primary: bool) -> CreatePhotoRepoInput {
    CreatePhotoRepoInput {
        animal_id,
        image: image.to_string(),
        is_primary,
        caption: String::new(),
        uploaded_by: None,
    }
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_primary_photo_is_exclusive() {
    let (_container, repos, animal_id) = setup_test_db().await;

    let first = repos
        .photos
        .create_photo(photo_input(animal_id, "animal_photos/1/a.jpg", true))
        .await
        .unwrap();
    let second = repos
        .photos
        .create_photo(photo_input(animal_id, "animal_photos/1/b.jpg", true))
        .await
        .unwrap();
    repos
        .photos
        .create_photo(photo_input(animal_id, "animal_photos/1/c.jpg", false))
        .await
        .unwrap();

    let photos = repos
        .photos
        .list_photos(ListPhotosRepoInput { animal_id })
        .await
        .unwrap();
    assert_eq!(photos.len(), 3);
    assert_eq!(photos.iter().filter(|p| p.is_primary).count(), 1);
    assert_eq!(photos[0].id, second.id);
    assert_eq!(select_display_photo(&photos).map(|p| p.id), Some(second.id));

    let stored_first = repos
        .photos
        .get_photo(GetPhotoRepoInput { photo_id: first.id })
        .await
        .unwrap()
        .unwrap();
    assert!(!stored_first.is_primary);

    repos
        .photos
        .delete_photo(DeletePhotoRepoInput {
            photo_id: second.id,
        })
        .await
        .unwrap();
    let missing = repos
        .photos
        .delete_photo(DeletePhotoRepoInput {
            photo_id: second.id,
        })
        .await;
    assert!(matches!(missing, Err(DomainError::PhotoNotFound(_))));
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_photo_update_moves_primary_flag() {
    let (_container, repos, animal_id) = setup_test_db().await;

    let first = repos
        .photos
        .create_photo(photo_input(animal_id, "animal_photos/1/a.jpg", true))
        .await
        .unwrap();
    let second = repos
        .photos
        .create_photo(photo_input(animal_id, "animal_photos/1/b.jpg", false))
        .await
        .unwrap();

    let updated = repos
        .photos
        .update_photo(UpdatePhotoRepoInput {
            photo_id: second.id,
            caption: "Side view".to_string(),
            is_primary: true,
        })
        .await
        .unwrap();
    assert!(updated.is_primary);
    assert_eq!(updated.caption, "Side view");
    assert_eq!(updated.image, "animal_photos/1/b.jpg");

    let stored_first = repos
        .photos
        .get_photo(GetPhotoRepoInput { photo_id: first.id })
        .await
        .unwrap()
        .unwrap();
    assert!(!stored_first.is_primary);

    let missing = repos
        .photos
        .update_photo(UpdatePhotoRepoInput {
            photo_id: 9999,
            caption: String::new(),
            is_primary: false,
        })
        .await;
    assert!(matches!(missing, Err(DomainError::PhotoNotFound(_))));
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_medical_record_update_and_delete() {
    let (_container, repos, animal_id) = setup_test_db().await;

    let record = repos
        .medical
        .create_medical_record(CreateMedicalRecordRepoInput {
            animal_id,
            record_type: MedicalRecordType::Diagnosis,
            description: "Otitis".to_string(),
            date_recorded: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            created_by: Some("vet".to_string()),
        })
        .await
        .unwrap();

    let updated = repos
        .medical
        .update_medical_record(UpdateMedicalRecordRepoInput {
            record_id: record.id,
            record_type: MedicalRecordType::Pathology,
            description: "Ear drops, 7 days".to_string(),
            date_recorded: NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
        })
        .await
        .unwrap();
    assert_eq!(updated.record_type, MedicalRecordType::Pathology);
    assert_eq!(updated.created_by.as_deref(), Some("vet"));
    assert_eq!(updated.animal_id, animal_id);

    repos
        .medical
        .delete_medical_record(DeleteMedicalRecordRepoInput {
            record_id: record.id,
        })
        .await
        .unwrap();
    let gone = repos
        .medical
        .get_medical_record(GetMedicalRecordRepoInput {
            record_id: record.id,
        })
        .await
        .unwrap();
    assert!(gone.is_none());

    let again = repos
        .medical
        .delete_medical_record(DeleteMedicalRecordRepoInput {
            record_id: record.id,
        })
        .await;
    assert!(matches!(again, Err(DomainError::MedicalRecordNotFound(_))));
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_children_for_unknown_animal() {
    let (_container, repos, _animal_id) = setup_test_db().await;

    let result = repos
        .photos
        .create_photo(photo_input(9999, "animal_photos/9999/a.jpg", false))
        .await;
    assert!(matches!(result, Err(DomainError::AnimalNotFound(_))));

    let result = repos
        .medical
        .create_medical_record(CreateMedicalRecordRepoInput {
            animal_id: 9999,
            record_type: MedicalRecordType::Diagnosis,
            description: "Otitis".to_string(),
            date_recorded: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            created_by: None,
        })
        .await;
    assert!(matches!(result, Err(DomainError::AnimalNotFound(_))));
}

#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn test_records_ordering_and_cascade() {
    let (_container, repos, animal_id) = setup_test_db().await;

    for (day, description) in [(1, "older"), (20, "newer")] {
        repos
            .medical
            .create_medical_record(CreateMedicalRecordRepoInput {
                animal_id,
                record_type: MedicalRecordType::Pathology,
                description: description.to_string(),
                date_recorded: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
                created_by: Some("vet".to_string()),
            })
            .await
            .unwrap();
    }
    let records = repos
        .medical
        .list_medical_records(ListMedicalRecordsRepoInput { animal_id })
        .await
        .unwrap();
    assert_eq!(records[0].description, "newer");

    for (name, other, day) in [
        (VaccineName::Other, Some("DHPP"), 15),
        (VaccineName::Rabies, None, 2),
    ] {
        repos
            .vaccinations
            .create_vaccination(CreateVaccinationRepoInput {
                animal_id,
                vaccine_name: name,
                other_vaccine_name: other.map(str::to_string),
                batch_number: Some("B-1".to_string()),
                date_administered: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
                next_due_date: None,
                administered_by: None,
                created_by: None,
            })
            .await
            .unwrap();
    }
    let vaccinations = repos
        .vaccinations
        .list_vaccinations(ListVaccinationsRepoInput { animal_id })
        .await
        .unwrap();
    assert_eq!(vaccinations[0].vaccine_name, VaccineName::Rabies);
    assert_eq!(vaccinations[1].display_name(), "DHPP");

    repos
        .photos
        .create_photo(photo_input(animal_id, "animal_photos/1/a.jpg", false))
        .await
        .unwrap();

    repos
        .animals
        .delete_animal(DeleteAnimalRepoInput { animal_id })
        .await
        .unwrap();

    assert!(
        repos
            .photos
            .list_photos(ListPhotosRepoInput { animal_id })
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        repos
            .medical
            .list_medical_records(ListMedicalRecordsRepoInput { animal_id })
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        repos
            .vaccinations
            .list_vaccinations(ListVaccinationsRepoInput { animal_id })
            .await
            .unwrap()
            .is_empty()
    );
}
