use chrono::NaiveDate;
use common::domain::{
    CreateMedicalRecordRepoInput, DeleteMedicalRecordRepoInput, DomainError, DomainResult,
    GetMedicalRecordRepoInput, ListMedicalRecordsRepoInput, MedicalRecord,
    MedicalRecordRepository, MedicalRecordType, UpdateMedicalRecordRepoInput,
};
use garde::Validate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Service request for adding a medical record
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddMedicalRecordRequest {
    #[garde(range(min = 1))]
    #[serde(skip)]
    pub animal_id: i64,
    #[garde(skip)]
    pub record_type: MedicalRecordType,
    #[garde(length(chars, min = 1, max = 300))]
    pub description: String,
    #[garde(skip)]
    pub date_recorded: NaiveDate,
    #[garde(skip)]
    #[serde(skip)]
    pub created_by: Option<String>,
}

/// Service request for correcting a medical record
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMedicalRecordRequest {
    #[garde(range(min = 1))]
    #[serde(skip)]
    pub record_id: i64,
    #[garde(skip)]
    pub record_type: MedicalRecordType,
    #[garde(length(chars, min = 1, max = 300))]
    pub description: String,
    #[garde(skip)]
    pub date_recorded: NaiveDate,
}

/// Domain service for medical records
pub struct MedicalRecordService {
    repository: Arc<dyn MedicalRecordRepository>,
}

impl MedicalRecordService {
    pub fn new(repository: Arc<dyn MedicalRecordRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, request), fields(animal_id = request.animal_id, record_type = %request.record_type))]
    pub async fn add_record(
        &self,
        mut request: AddMedicalRecordRequest,
    ) -> DomainResult<MedicalRecord> {
        request.description = request.description.trim().to_string();
        common::garde::validate_struct(&request)?;

        let record = self
            .repository
            .create_medical_record(CreateMedicalRecordRepoInput {
                animal_id: request.animal_id,
                record_type: request.record_type,
                description: request.description,
                date_recorded: request.date_recorded,
                created_by: request.created_by,
            })
            .await?;

        info!(record_id = record.id, "Medical record added");
        Ok(record)
    }

    pub async fn list_records(&self, animal_id: i64) -> DomainResult<Vec<MedicalRecord>> {
        debug!(animal_id, "Listing medical records");
        self.repository
            .list_medical_records(ListMedicalRecordsRepoInput { animal_id })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_record(&self, record_id: i64) -> DomainResult<MedicalRecord> {
        self.repository
            .get_medical_record(GetMedicalRecordRepoInput { record_id })
            .await?
            .ok_or_else(|| {
                DomainError::MedicalRecordNotFound(format!(
                    "Medical record not found: {}",
                    record_id
                ))
            })
    }

    #[instrument(skip(self, request), fields(record_id = request.record_id, record_type = %request.record_type))]
    pub async fn update_record(
        &self,
        mut request: UpdateMedicalRecordRequest,
    ) -> DomainResult<MedicalRecord> {
        request.description = request.description.trim().to_string();
        common::garde::validate_struct(&request)?;

        let record = self
            .repository
            .update_medical_record(UpdateMedicalRecordRepoInput {
                record_id: request.record_id,
                record_type: request.record_type,
                description: request.description,
                date_recorded: request.date_recorded,
            })
            .await?;

        info!(animal_id = record.animal_id, "Medical record updated");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn delete_record(&self, record_id: i64) -> DomainResult<()> {
        self.repository
            .delete_medical_record(DeleteMedicalRecordRepoInput { record_id })
            .await?;

        info!("Medical record deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::domain::MockMedicalRecordRepository;

    fn request(description: &str) -> AddMedicalRecordRequest {
        AddMedicalRecordRequest {
            animal_id: 2,
            record_type: MedicalRecordType::Diagnosis,
            description: description.to_string(),
            date_recorded: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            created_by: Some("vet".to_string()),
        }
    }

    #[tokio::test]
    async fn test_add_record() {
        let mut mock_repo = MockMedicalRecordRepository::new();
        mock_repo
            .expect_create_medical_record()
            .withf(|input| input.animal_id == 2 && input.description == "Otitis")
            .times(1)
            .return_once(|input| {
                Ok(MedicalRecord {
                    id: 11,
                    animal_id: input.animal_id,
                    record_type: input.record_type,
                    description: input.description,
                    date_recorded: input.date_recorded,
                    created_by: input.created_by,
                    created_at: Utc::now(),
                })
            });

        let service = MedicalRecordService::new(Arc::new(mock_repo));
        let record = service.add_record(request(" Otitis ")).await.unwrap();
        assert_eq!(record.id, 11);
        assert_eq!(record.record_type, MedicalRecordType::Diagnosis);
    }

    #[tokio::test]
    async fn test_description_bounds() {
        let service = MedicalRecordService::new(Arc::new(MockMedicalRecordRepository::new()));

        let result = service.add_record(request("")).await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));

        let result = service.add_record(request("   \n\t")).await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));

        let result = service.add_record(request(&"x".repeat(301))).await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_unknown_animal_propagates() {
        let mut mock_repo = MockMedicalRecordRepository::new();
        mock_repo
            .expect_create_medical_record()
            .times(1)
            .return_once(|_| Err(DomainError::AnimalNotFound("Animal not found: 2".to_string())));

        let service = MedicalRecordService::new(Arc::new(mock_repo));
        let result = service.add_record(request("Otitis")).await;
        assert!(matches!(result, Err(DomainError::AnimalNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_record_trims_and_validates() {
        let mut mock_repo = MockMedicalRecordRepository::new();
        mock_repo
            .expect_update_medical_record()
            .withf(|input| input.record_id == 8 && input.description == "Healed")
            .times(1)
            .return_once(|input| {
                Ok(MedicalRecord {
                    id: input.record_id,
                    animal_id: 2,
                    record_type: input.record_type,
                    description: input.description,
                    date_recorded: input.date_recorded,
                    created_by: Some("vet".to_string()),
                    created_at: Utc::now(),
                })
            });

        let service = MedicalRecordService::new(Arc::new(mock_repo));
        let update = |description: &str| UpdateMedicalRecordRequest {
            record_id: 8,
            record_type: MedicalRecordType::Pathology,
            description: description.to_string(),
            date_recorded: NaiveDate::from_ymd_opt(2024, 4, 9).unwrap(),
        };

        let record = service.update_record(update(" Healed ")).await.unwrap();
        assert_eq!(record.record_type, MedicalRecordType::Pathology);

        let blank = service.update_record(update("  ")).await;
        assert!(matches!(blank, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_missing_record_not_found() {
        let mut mock_repo = MockMedicalRecordRepository::new();
        mock_repo
            .expect_get_medical_record()
            .times(1)
            .return_once(|_| Ok(None));
        mock_repo
            .expect_delete_medical_record()
            .times(1)
            .return_once(|input| {
                Err(DomainError::MedicalRecordNotFound(format!(
                    "Medical record not found: {}",
                    input.record_id
                )))
            });

        let service = MedicalRecordService::new(Arc::new(mock_repo));
        let result = service.get_record(5).await;
        assert!(matches!(result, Err(DomainError::MedicalRecordNotFound(_))));
        let result = service.delete_record(5).await;
        assert!(matches!(result, Err(DomainError::MedicalRecordNotFound(_))));
    }
}
