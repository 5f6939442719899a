use crate::domain::{LimitedView, PublicAnimalView, PublicLookup, StaffAnimalView};
use common::domain::{
    Animal, AnimalRepository, DomainError, DomainResult, GetAnimalByChipRepoInput,
    ListPhotosRepoInput, PhotoRepository, select_display_photo,
};
use common::identity::{IdentitySettings, ScanParse, parse_scan};
use common::media::MediaStore;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Resolves scanned or typed identifiers to animal views shaped by caller trust
pub struct LookupService {
    animal_repository: Arc<dyn AnimalRepository>,
    photo_repository: Arc<dyn PhotoRepository>,
    media_store: Arc<dyn MediaStore>,
    settings: IdentitySettings,
}

impl LookupService {
    pub fn new(
        animal_repository: Arc<dyn AnimalRepository>,
        photo_repository: Arc<dyn PhotoRepository>,
        media_store: Arc<dyn MediaStore>,
        settings: IdentitySettings,
    ) -> Self {
        Self {
            animal_repository,
            photo_repository,
            media_store,
            settings,
        }
    }

    /// Staff lookup from raw scanner output or a typed chip id
    #[instrument(skip(self, raw))]
    pub async fn resolve_for_staff(&self, raw: &str) -> DomainResult<StaffAnimalView> {
        let parsed = parse_scan(raw);
        match &parsed {
            ScanParse::Payload { .. } => debug!("scan input is an identity payload"),
            ScanParse::Literal(_) => debug!("scan input treated as literal chip id"),
        }

        let chip_id = parsed.chip_id();
        if chip_id.is_empty() {
            return Err(DomainError::ValidationError(
                "No chip ID found in QR code".to_string(),
            ));
        }

        let animal = self
            .find_by_chip(chip_id)
            .await?
            .ok_or_else(|| {
                DomainError::AnimalNotFound(format!("Animal with chip ID {} not found", chip_id))
            })?;

        let photo_url = self.display_photo_url(animal.id).await?;
        Ok(StaffAnimalView::new(&animal, photo_url))
    }

    /// Public lookup by plain chip id
    #[instrument(skip(self, chip_id))]
    pub async fn resolve_for_public(&self, chip_id: &str) -> DomainResult<PublicLookup> {
        let chip_id = chip_id.trim();
        if chip_id.is_empty() {
            return Err(DomainError::ValidationError(
                "chip_id parameter required".to_string(),
            ));
        }

        let animal = self
            .find_by_chip(chip_id)
            .await?
            .ok_or_else(|| DomainError::AnimalNotFound("Animal not found".to_string()))?;

        if !animal.public_visibility {
            debug!(animal_id = animal.id, "animal not public, returning limited view");
            return Ok(PublicLookup::Limited(LimitedView::new(&animal)));
        }

        Ok(PublicLookup::Public(self.public_view(&animal).await?))
    }

    /// Adoption-facing view with absolute URLs
    pub async fn public_view(&self, animal: &Animal) -> DomainResult<PublicAnimalView> {
        let photo_path = self.display_photo_url(animal.id).await?;
        Ok(PublicAnimalView::new(
            animal,
            photo_path.as_deref(),
            &self.settings,
        ))
    }

    /// Site-relative URL of the animal's display photo
    pub async fn display_photo_url(&self, animal_id: i64) -> DomainResult<Option<String>> {
        let photos = self
            .photo_repository
            .list_photos(ListPhotosRepoInput { animal_id })
            .await?;

        Ok(select_display_photo(&photos).map(|photo| self.media_store.url(&photo.image)))
    }

    async fn find_by_chip(&self, chip_id: &str) -> DomainResult<Option<Animal>> {
        self.animal_repository
            .get_animal_by_chip_id(GetAnimalByChipRepoInput {
                chip_id: chip_id.to_string(),
            })
            .await
    }
}
