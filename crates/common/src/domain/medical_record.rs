use crate::domain::result::DomainResult;
use crate::domain::MedicalRecordType;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Medical record domain entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicalRecord {
    pub id: i64,
    pub animal_id: i64,
    pub record_type: MedicalRecordType,
    pub description: String,
    pub date_recorded: NaiveDate,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMedicalRecordRepoInput {
    pub animal_id: i64,
    pub record_type: MedicalRecordType,
    pub description: String,
    pub date_recorded: NaiveDate,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMedicalRecordsRepoInput {
    pub animal_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetMedicalRecordRepoInput {
    pub record_id: i64,
}

/// Replaces the editable fields; the owning animal and author stay fixed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateMedicalRecordRepoInput {
    pub record_id: i64,
    pub record_type: MedicalRecordType,
    pub description: String,
    pub date_recorded: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteMedicalRecordRepoInput {
    pub record_id: i64,
}

/// Repository trait for medical record storage operations
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MedicalRecordRepository: Send + Sync {
    async fn create_medical_record(
        &self,
        input: CreateMedicalRecordRepoInput,
    ) -> DomainResult<MedicalRecord>;

    async fn get_medical_record(
        &self,
        input: GetMedicalRecordRepoInput,
    ) -> DomainResult<Option<MedicalRecord>>;

    /// Newest `date_recorded` first
    async fn list_medical_records(
        &self,
        input: ListMedicalRecordsRepoInput,
    ) -> DomainResult<Vec<MedicalRecord>>;

    /// Fails with `MedicalRecordNotFound` when the record does not exist
    async fn update_medical_record(
        &self,
        input: UpdateMedicalRecordRepoInput,
    ) -> DomainResult<MedicalRecord>;

    /// Fails with `MedicalRecordNotFound` when the record does not exist
    async fn delete_medical_record(&self, input: DeleteMedicalRecordRepoInput)
    -> DomainResult<()>;
}
