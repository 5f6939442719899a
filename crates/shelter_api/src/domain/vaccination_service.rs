use chrono::NaiveDate;
use common::domain::{
    CreateVaccinationRepoInput, DomainError, DomainResult, ListVaccinationsRepoInput,
    Vaccination, VaccinationRepository, VaccineName,
};
use garde::Validate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Service request for recording a vaccination
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordVaccinationRequest {
    #[garde(range(min = 1))]
    #[serde(skip)]
    pub animal_id: i64,
    #[garde(skip)]
    pub vaccine_name: VaccineName,
    #[garde(length(chars, max = 100))]
    #[serde(default)]
    pub other_vaccine_name: Option<String>,
    #[garde(length(chars, max = 50))]
    #[serde(default)]
    pub batch_number: Option<String>,
    #[garde(skip)]
    pub date_administered: NaiveDate,
    #[garde(skip)]
    #[serde(default)]
    pub next_due_date: Option<NaiveDate>,
    #[garde(length(chars, max = 100))]
    #[serde(default)]
    pub administered_by: Option<String>,
    #[garde(skip)]
    #[serde(skip)]
    pub created_by: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Domain service for vaccinations. Entries are append-only.
pub struct VaccinationService {
    repository: Arc<dyn VaccinationRepository>,
}

impl VaccinationService {
    pub fn new(repository: Arc<dyn VaccinationRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, request), fields(animal_id = request.animal_id, vaccine = %request.vaccine_name))]
    pub async fn record_vaccination(
        &self,
        request: RecordVaccinationRequest,
    ) -> DomainResult<Vaccination> {
        common::garde::validate_struct(&request)?;

        let other_vaccine_name = non_blank(request.other_vaccine_name);
        let other_vaccine_name = match request.vaccine_name {
            VaccineName::Other if other_vaccine_name.is_none() => {
                return Err(DomainError::ValidationError(
                    "other_vaccine_name is required when vaccine_name is other".to_string(),
                ));
            }
            VaccineName::Other => other_vaccine_name,
            VaccineName::Rabies => None,
        };

        if let Some(next_due) = request.next_due_date {
            if next_due < request.date_administered {
                return Err(DomainError::ValidationError(
                    "next_due_date cannot be before date_administered".to_string(),
                ));
            }
        }

        let vaccination = self
            .repository
            .create_vaccination(CreateVaccinationRepoInput {
                animal_id: request.animal_id,
                vaccine_name: request.vaccine_name,
                other_vaccine_name,
                batch_number: non_blank(request.batch_number),
                date_administered: request.date_administered,
                next_due_date: request.next_due_date,
                administered_by: non_blank(request.administered_by),
                created_by: request.created_by,
            })
            .await?;

        info!(vaccination_id = vaccination.id, "Vaccination recorded");
        Ok(vaccination)
    }

    /// Rabies first, then newest administration first
    pub async fn list_vaccinations(&self, animal_id: i64) -> DomainResult<Vec<Vaccination>> {
        debug!(animal_id, "Listing vaccinations");
        self.repository
            .list_vaccinations(ListVaccinationsRepoInput { animal_id })
            .await
    }
}
