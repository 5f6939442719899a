use crate::domain::{
    CreateMedicalRecordRepoInput, DeleteMedicalRecordRepoInput, DomainError, DomainResult,
    GetMedicalRecordRepoInput, ListMedicalRecordsRepoInput, MedicalRecord,
    MedicalRecordRepository, UpdateMedicalRecordRepoInput,
};
use crate::postgres::PostgresClient;
use crate::postgres::animal_repository::parse_code;
use async_trait::async_trait;
use chrono::Utc;
use tokio_postgres::Row;
use tracing::{debug, instrument};

const MEDICAL_RECORD_COLUMNS: &str =
    "id, animal_id, record_type, description, date_recorded, created_by, created_at";

fn row_to_medical_record(row: &Row) -> DomainResult<MedicalRecord> {
    let record_type: String = row.get(2);
    Ok(MedicalRecord {
        id: row.get(0),
        animal_id: row.get(1),
        record_type: parse_code("record_type", &record_type)?,
        description: row.get(3),
        date_recorded: row.get(4),
        created_by: row.get(5),
        created_at: row.get(6),
    })
}

/// PostgreSQL implementation of MedicalRecordRepository trait
#[derive(Clone)]
pub struct PostgresMedicalRecordRepository {
    client: PostgresClient,
}

impl PostgresMedicalRecordRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MedicalRecordRepository for PostgresMedicalRecordRepository {
    #[instrument(skip(self, input), fields(animal_id = input.animal_id, record_type = %input.record_type))]
    async fn create_medical_record(
        &self,
        input: CreateMedicalRecordRepoInput,
    ) -> DomainResult<MedicalRecord> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let result = conn
            .query_one(
                &format!(
                    "INSERT INTO medical_records (animal_id, record_type, description, date_recorded, created_by, created_at)
                     VALUES ($1, $2, $3, $4, $5, $6)
                     RETURNING {}",
                    MEDICAL_RECORD_COLUMNS
                ),
                &[
                    &input.animal_id,
                    &input.record_type.as_str(),
                    &input.description,
                    &input.date_recorded,
                    &input.created_by,
                    &Utc::now(),
                ],
            )
            .await;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                // PostgreSQL error code 23503 is foreign_key_violation
                if let Some(db_err) = e.as_db_error() {
                    if db_err.code().code() == "23503" {
                        return Err(DomainError::AnimalNotFound(format!(
                            "Animal not found: {}",
                            input.animal_id
                        )));
                    }
                }
                return Err(DomainError::RepositoryError(e.into()));
            }
        };

        let record = row_to_medical_record(&row)?;
        debug!(record_id = record.id, "stored medical record");
        Ok(record)
    }

    #[instrument(skip(self, input), fields(record_id = input.record_id))]
    async fn get_medical_record(
        &self,
        input: GetMedicalRecordRepoInput,
    ) -> DomainResult<Option<MedicalRecord>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let row = conn
            .query_opt(
                &format!(
                    "SELECT {} FROM medical_records WHERE id = $1",
                    MEDICAL_RECORD_COLUMNS
                ),
                &[&input.record_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        row.as_ref().map(row_to_medical_record).transpose()
    }

    #[instrument(skip(self, input), fields(animal_id = input.animal_id))]
    async fn list_medical_records(
        &self,
        input: ListMedicalRecordsRepoInput,
    ) -> DomainResult<Vec<MedicalRecord>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let rows = conn
            .query(
                &format!(
                    "SELECT {} FROM medical_records
                     WHERE animal_id = $1
                     ORDER BY date_recorded DESC, id DESC",
                    MEDICAL_RECORD_COLUMNS
                ),
                &[&input.animal_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        rows.iter().map(row_to_medical_record).collect()
    }

    #[instrument(skip(self, input), fields(record_id = input.record_id, record_type = %input.record_type))]
    async fn update_medical_record(
        &self,
        input: UpdateMedicalRecordRepoInput,
    ) -> DomainResult<MedicalRecord> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let row = conn
            .query_opt(
                &format!(
                    "UPDATE medical_records SET record_type = $2, description = $3, date_recorded = $4
                     WHERE id = $1
                     RETURNING {}",
                    MEDICAL_RECORD_COLUMNS
                ),
                &[
                    &input.record_id,
                    &input.record_type.as_str(),
                    &input.description,
                    &input.date_recorded,
                ],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?
            .ok_or_else(|| {
                DomainError::MedicalRecordNotFound(format!(
                    "Medical record not found: {}",
                    input.record_id
                ))
            })?;

        let record = row_to_medical_record(&row)?;
        debug!(record_id = record.id, "updated medical record");
        Ok(record)
    }

    #[instrument(skip(self, input), fields(record_id = input.record_id))]
    async fn delete_medical_record(
        &self,
        input: DeleteMedicalRecordRepoInput,
    ) -> DomainResult<()> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let deleted = conn
            .execute(
                "DELETE FROM medical_records WHERE id = $1",
                &[&input.record_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        if deleted == 0 {
            return Err(DomainError::MedicalRecordNotFound(format!(
                "Medical record not found: {}",
                input.record_id
            )));
        }

        debug!(record_id = input.record_id, "deleted medical record");
        Ok(())
    }
}
