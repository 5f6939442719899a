use crate::domain::{
    CreateVaccinationRepoInput, DomainError, DomainResult, ListVaccinationsRepoInput,
    Vaccination, VaccinationRepository,
};
use crate::postgres::PostgresClient;
use crate::postgres::animal_repository::parse_code;
use async_trait::async_trait;
use chrono::Utc;
use tokio_postgres::Row;
use tracing::{debug, instrument};

const VACCINATION_COLUMNS: &str = "id, animal_id, vaccine_name, other_vaccine_name, batch_number, \
     date_administered, next_due_date, administered_by, created_by, created_at";

fn row_to_vaccination(row: &Row) -> DomainResult<Vaccination> {
    let vaccine_name: String = row.get(2);
    Ok(Vaccination {
        id: row.get(0),
        animal_id: row.get(1),
        vaccine_name: parse_code("vaccine_name", &vaccine_name)?,
        other_vaccine_name: row.get(3),
        batch_number: row.get(4),
        date_administered: row.get(5),
        next_due_date: row.get(6),
        administered_by: row.get(7),
        created_by: row.get(8),
        created_at: row.get(9),
    })
}

/// PostgreSQL implementation of VaccinationRepository trait
#[derive(Clone)]
pub struct PostgresVaccinationRepository {
    client: PostgresClient,
}

impl PostgresVaccinationRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VaccinationRepository for PostgresVaccinationRepository {
    #[instrument(skip(self, input), fields(animal_id = input.animal_id, vaccine_name = %input.vaccine_name))]
    async fn create_vaccination(
        &self,
        input: CreateVaccinationRepoInput,
    ) -> DomainResult<Vaccination> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let result = conn
            .query_one(
                &format!(
                    "INSERT INTO vaccinations (animal_id, vaccine_name, other_vaccine_name, batch_number,
                        date_administered, next_due_date, administered_by, created_by, created_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                     RETURNING {}",
                    VACCINATION_COLUMNS
                ),
                &[
                    &input.animal_id,
                    &input.vaccine_name.as_str(),
                    &input.other_vaccine_name,
                    &input.batch_number,
                    &input.date_administered,
                    &input.next_due_date,
                    &input.administered_by,
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

        let vaccination = row_to_vaccination(&row)?;
        debug!(vaccination_id = vaccination.id, "recorded vaccination");
        Ok(vaccination)
    }

    #[instrument(skip(self, input), fields(animal_id = input.animal_id))]
    async fn list_vaccinations(
        &self,
        input: ListVaccinationsRepoInput,
    ) -> DomainResult<Vec<Vaccination>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let rows = conn
            .query(
                &format!(
                    "SELECT {} FROM vaccinations
                     WHERE animal_id = $1
                     ORDER BY (vaccine_name = 'rabies') DESC, date_administered DESC, id DESC",
                    VACCINATION_COLUMNS
                ),
                &[&input.animal_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        rows.iter().map(row_to_vaccination).collect()
    }
}
