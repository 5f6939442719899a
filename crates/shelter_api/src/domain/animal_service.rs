use crate::domain::IdentityService;
use chrono::NaiveDate;
use common::domain::{
    AdoptionStatus, AgeCategory, Animal, AnimalOrdering, AnimalRepository, AnimalStats, Behavior,
    CreateAnimalRepoInput, DeleteAnimalRepoInput, DomainError, DomainResult, Gender,
    GetAnimalRepoInput, ListAnimalsRepoInput, ListPhotosRepoInput, PhotoRepository,
    SetPublicVisibilityRepoInput, Species, SterilizationStatus, UpdateAnimalRepoInput,
    VaccinationStatus,
};
use common::garde::chip_id_rule;
use common::media::MediaStore;
use garde::Validate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Editable attributes shared by create and update
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct AnimalFields {
    #[garde(length(chars, min = 1, max = 20))]
    pub name: String,
    #[garde(skip)]
    pub species: Species,
    #[garde(skip)]
    pub gender: Gender,
    #[garde(range(min = 0, max = 99))]
    #[serde(default)]
    pub age_numeric: Option<i32>,
    #[garde(skip)]
    #[serde(default)]
    pub age_category: Option<AgeCategory>,
    #[garde(skip)]
    #[serde(default)]
    pub injured: bool,
    #[garde(skip)]
    pub behavior: Behavior,
    #[garde(skip)]
    pub vaccination_status: VaccinationStatus,
    #[garde(skip)]
    pub sterilization_status: SterilizationStatus,
    #[garde(range(min = 1, max = 20))]
    pub cage_number: i32,
    #[garde(length(chars, min = 1, max = 100))]
    pub capture_location: String,
    #[garde(skip)]
    pub capture_date: NaiveDate,
    #[garde(skip)]
    #[serde(default)]
    pub finder_contact: String,
    #[garde(skip)]
    #[serde(default)]
    pub public_visibility: bool,
    #[garde(skip)]
    #[serde(default)]
    pub adoption_status: AdoptionStatus,
    #[garde(length(chars, max = 100))]
    #[serde(default)]
    pub shelter: Option<String>,
}

impl AnimalFields {
    /// Exactly one of the two age forms must be present
    fn check_single_age(&self) -> DomainResult<()> {
        match (self.age_numeric, self.age_category) {
            (Some(_), Some(_)) => Err(DomainError::ValidationError(
                "Provide either numeric age or age category, not both".to_string(),
            )),
            (None, None) => Err(DomainError::ValidationError(
                "Either numeric age or age category must be provided".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn normalized_shelter(&self) -> Option<String> {
        self.shelter
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Service request for registering an animal
#[derive(Debug, Clone, Validate)]
pub struct CreateAnimalRequest {
    #[garde(custom(chip_id_rule))]
    pub chip_id: String,
    #[garde(dive)]
    pub fields: AnimalFields,
    #[garde(skip)]
    pub created_by: Option<String>,
}

/// Service request for updating an animal; the chip id cannot change
#[derive(Debug, Clone, Validate)]
pub struct UpdateAnimalRequest {
    #[garde(range(min = 1))]
    pub animal_id: i64,
    #[garde(dive)]
    pub fields: AnimalFields,
}

/// Back-office listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListAnimalsRequest {
    pub species: Option<Species>,
    pub gender: Option<Gender>,
    pub behavior: Option<Behavior>,
    pub adoption_status: Option<AdoptionStatus>,
    pub public_visibility: Option<bool>,
    pub shelter: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<AnimalOrdering>,
}

impl ListAnimalsRequest {
    pub fn into_repo_input(self) -> ListAnimalsRepoInput {
        ListAnimalsRepoInput {
            species: self.species,
            gender: self.gender,
            behavior: self.behavior,
            adoption_statuses: self.adoption_status.into_iter().collect(),
            public_visibility: self.public_visibility,
            shelter: self.shelter,
            search: self.search,
            ordering: self.ordering.unwrap_or_default(),
        }
    }
}

/// Domain service for animal records
pub struct AnimalService {
    animal_repository: Arc<dyn AnimalRepository>,
    photo_repository: Arc<dyn PhotoRepository>,
    media_store: Arc<dyn MediaStore>,
    identity_service: Arc<IdentityService>,
}

impl AnimalService {
    pub fn new(
        animal_repository: Arc<dyn AnimalRepository>,
        photo_repository: Arc<dyn PhotoRepository>,
        media_store: Arc<dyn MediaStore>,
        identity_service: Arc<IdentityService>,
    ) -> Self {
        Self {
            animal_repository,
            photo_repository,
            media_store,
            identity_service,
        }
    }

    /// Register an animal, then generate its identity image.
    #[instrument(skip(self, request), fields(chip_id = %request.chip_id))]
    pub async fn create_animal(&self, request: CreateAnimalRequest) -> DomainResult<Animal> {
        debug!("Creating animal");
        common::garde::validate_struct(&request)?;
        request.fields.check_single_age()?;

        let shelter = request.fields.normalized_shelter();
        let fields = request.fields;
        let repo_input = CreateAnimalRepoInput {
            chip_id: request.chip_id,
            name: fields.name,
            species: fields.species,
            gender: fields.gender,
            age_numeric: fields.age_numeric,
            age_category: fields.age_category,
            injured: fields.injured,
            behavior: fields.behavior,
            vaccination_status: fields.vaccination_status,
            sterilization_status: fields.sterilization_status,
            cage_number: fields.cage_number,
            capture_location: fields.capture_location,
            capture_date: fields.capture_date,
            finder_contact: fields.finder_contact,
            public_visibility: fields.public_visibility,
            adoption_status: fields.adoption_status,
            shelter,
            created_by: request.created_by,
        };

        let animal = self.animal_repository.create_animal(repo_input).await?;
        info!(animal_id = animal.id, "Animal created successfully");

        Ok(self
            .identity_service
            .ensure_identity_image(animal, false)
            .await)
    }

    #[instrument(skip(self))]
    pub async fn get_animal(&self, animal_id: i64) -> DomainResult<Animal> {
        debug!("Getting animal");

        self.animal_repository
            .get_animal(GetAnimalRepoInput { animal_id })
            .await?
            .ok_or_else(|| DomainError::AnimalNotFound(format!("Animal not found: {}", animal_id)))
    }

    #[instrument(skip(self, request))]
    pub async fn list_animals(&self, request: ListAnimalsRequest) -> DomainResult<Vec<Animal>> {
        debug!(?request, "Listing animals");

        let animals = self
            .animal_repository
            .list_animals(request.into_repo_input())
            .await?;

        debug!(count = animals.len(), "Listed animals");
        Ok(animals)
    }

    /// Public adoption listing: visible animals that are available or pending
    #[instrument(skip(self))]
    pub async fn list_public_animals(&self) -> DomainResult<Vec<Animal>> {
        self.animal_repository
            .list_animals(ListAnimalsRepoInput {
                public_visibility: Some(true),
                adoption_statuses: vec![AdoptionStatus::Available, AdoptionStatus::Pending],
                ..Default::default()
            })
            .await
    }

    /// Public detail; animals that are not publicly visible do not exist here
    #[instrument(skip(self))]
    pub async fn get_public_animal(&self, animal_id: i64) -> DomainResult<Animal> {
        self.animal_repository
            .get_animal(GetAnimalRepoInput { animal_id })
            .await?
            .filter(|animal| animal.public_visibility)
            .ok_or_else(|| DomainError::AnimalNotFound(format!("Animal not found: {}", animal_id)))
    }

    /// Update an animal's editable fields, then make sure it has an identity image.
    #[instrument(skip(self, request), fields(animal_id = request.animal_id))]
    pub async fn update_animal(&self, request: UpdateAnimalRequest) -> DomainResult<Animal> {
        debug!("Updating animal");
        common::garde::validate_struct(&request)?;
        request.fields.check_single_age()?;

        let shelter = request.fields.normalized_shelter();
        let fields = request.fields;
        let repo_input = UpdateAnimalRepoInput {
            animal_id: request.animal_id,
            name: fields.name,
            species: fields.species,
            gender: fields.gender,
            age_numeric: fields.age_numeric,
            age_category: fields.age_category,
            injured: fields.injured,
            behavior: fields.behavior,
            vaccination_status: fields.vaccination_status,
            sterilization_status: fields.sterilization_status,
            cage_number: fields.cage_number,
            capture_location: fields.capture_location,
            capture_date: fields.capture_date,
            finder_contact: fields.finder_contact,
            public_visibility: fields.public_visibility,
            adoption_status: fields.adoption_status,
            shelter,
        };

        let animal = self.animal_repository.update_animal(repo_input).await?;
        info!(animal_id = animal.id, "Animal updated successfully");

        Ok(self
            .identity_service
            .ensure_identity_image(animal, false)
            .await)
    }

    /// Delete an animal with its children; stored media is removed best-effort.
    #[instrument(skip(self))]
    pub async fn delete_animal(&self, animal_id: i64) -> DomainResult<()> {
        debug!("Deleting animal");

        let animal = self.get_animal(animal_id).await?;
        let photos = self
            .photo_repository
            .list_photos(ListPhotosRepoInput { animal_id })
            .await?;

        self.animal_repository
            .delete_animal(DeleteAnimalRepoInput { animal_id })
            .await?;

        for photo in &photos {
            if let Err(e) = self.media_store.delete(&photo.image).await {
                warn!(photo_id = photo.id, error = %e, "failed to remove photo file");
            }
        }
        self.identity_service.remove_identity_image(&animal).await;

        info!(chip_id = %animal.chip_id, "Animal deleted successfully");
        Ok(())
    }

    /// Forced identity image regeneration; returns how many images were written.
    /// Unknown ids and failed encodings are skipped.
    #[instrument(skip(self, animal_ids), fields(count = animal_ids.len()))]
    pub async fn regenerate_identity_images(&self, animal_ids: Vec<i64>) -> DomainResult<usize> {
        if animal_ids.is_empty() {
            return Err(DomainError::ValidationError(
                "No animals selected".to_string(),
            ));
        }

        let mut regenerated = 0;
        for animal_id in animal_ids {
            let Some(animal) = self
                .animal_repository
                .get_animal(GetAnimalRepoInput { animal_id })
                .await?
            else {
                debug!(animal_id, "skipping unknown animal");
                continue;
            };

            match self
                .identity_service
                .regenerate_identity_image(animal)
                .await
            {
                Ok(_) => regenerated += 1,
                Err(e) => warn!(animal_id, error = %e, "identity image regeneration failed"),
            }
        }

        info!(regenerated, "Identity images regenerated");
        Ok(regenerated)
    }

    /// Bulk make public or private; returns the number of animals updated
    #[instrument(skip(self, animal_ids), fields(count = animal_ids.len()))]
    pub async fn set_public_visibility(
        &self,
        animal_ids: Vec<i64>,
        public_visibility: bool,
    ) -> DomainResult<u64> {
        if animal_ids.is_empty() {
            return Err(DomainError::ValidationError(
                "No animals selected".to_string(),
            ));
        }

        let updated = self
            .animal_repository
            .set_public_visibility(SetPublicVisibilityRepoInput {
                animal_ids,
                public_visibility,
            })
            .await?;

        info!(updated, "Public visibility changed");
        Ok(updated)
    }

    pub async fn animal_stats(&self) -> DomainResult<AnimalStats> {
        self.animal_repository.animal_stats().await
    }

    pub fn identity_image_url(&self, animal: &Animal) -> Option<String> {
        self.identity_service.identity_image_url(animal)
    }
}
