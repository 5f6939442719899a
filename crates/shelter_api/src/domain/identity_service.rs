use common::domain::{Animal, AnimalRepository, UpdateIdentityImageRepoInput};
use common::identity::{EncodedImage, EncodingFailure, IdentitySettings, encode_identity};
use common::media::MediaStore;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Generates, stores and removes animal identity images.
///
/// Generation is an explicit step run by the service layer after a record
/// write; it only ever touches the `identity_image` column.
pub struct IdentityService {
    animal_repository: Arc<dyn AnimalRepository>,
    media_store: Arc<dyn MediaStore>,
    settings: IdentitySettings,
}

impl IdentityService {
    pub fn new(
        animal_repository: Arc<dyn AnimalRepository>,
        media_store: Arc<dyn MediaStore>,
        settings: IdentitySettings,
    ) -> Self {
        Self {
            animal_repository,
            media_store,
            settings,
        }
    }

    pub fn settings(&self) -> &IdentitySettings {
        &self.settings
    }

    /// Pure payload + PNG rendering for the animal's current state
    pub fn encode_identity(&self, animal: &Animal) -> Result<EncodedImage, EncodingFailure> {
        encode_identity(animal, &self.settings)
    }

    /// Makes sure the animal has an identity image, generating one when it is
    /// missing or when `force` is set.
    ///
    /// Failures are logged and swallowed: the animal comes back without an
    /// image and generation is attempted again on its next save.
    #[instrument(skip(self, animal), fields(animal_id = animal.id, chip_id = %animal.chip_id))]
    pub async fn ensure_identity_image(&self, animal: Animal, force: bool) -> Animal {
        if animal.has_identity_image() && !force {
            debug!("identity image already present");
            return animal;
        }

        let fallback = animal.clone();
        match self.regenerate_identity_image(animal).await {
            Ok(animal) => animal,
            Err(e) => {
                warn!(error = %e, "identity image generation failed");
                fallback
            }
        }
    }

    /// Encodes and stores a fresh identity image, overwriting any previous one
    pub async fn regenerate_identity_image(
        &self,
        mut animal: Animal,
    ) -> Result<Animal, EncodingFailure> {
        let key = self.store_identity_image(&animal).await?;
        info!(animal_id = animal.id, key = %key, "identity image generated");
        animal.identity_image = Some(key);
        Ok(animal)
    }

    async fn store_identity_image(&self, animal: &Animal) -> Result<String, EncodingFailure> {
        let encoded = self.encode_identity(animal)?;

        self.media_store
            .upload(&encoded.key, encoded.png)
            .await
            .map_err(EncodingFailure::Storage)?;

        self.animal_repository
            .update_identity_image(UpdateIdentityImageRepoInput {
                animal_id: animal.id,
                identity_image: Some(encoded.key.clone()),
            })
            .await
            .map_err(|e| EncodingFailure::Storage(e.into()))?;

        Ok(encoded.key)
    }

    /// Site-relative URL of the stored identity image, if any
    pub fn identity_image_url(&self, animal: &Animal) -> Option<String> {
        animal
            .identity_image
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(|key| self.media_store.url(key))
    }

    /// Best-effort removal of the stored image file
    pub async fn remove_identity_image(&self, animal: &Animal) {
        let Some(key) = animal.identity_image.as_deref().filter(|k| !k.is_empty()) else {
            return;
        };
        if let Err(e) = self.media_store.delete(key).await {
            warn!(animal_id = animal.id, key = %key, error = %e, "failed to remove identity image");
        }
    }
}
