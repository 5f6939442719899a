use bytes::Bytes;
use common::domain::{
    AnimalPhoto, AnimalRepository, CreatePhotoRepoInput, DeletePhotoRepoInput, DomainError,
    DomainResult, GetAnimalRepoInput, GetPhotoRepoInput, ListPhotosRepoInput, PhotoRepository,
    UpdatePhotoRepoInput,
};
use common::media::MediaStore;
use garde::Validate;
use image::ImageFormat;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Largest accepted photo upload
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

/// Service request for attaching a photo to an animal
#[derive(Debug, Clone, Validate)]
pub struct AddPhotoRequest {
    #[garde(range(min = 1))]
    pub animal_id: i64,
    #[garde(skip)]
    pub content: Bytes,
    /// Client-side file name, only used in messages
    #[garde(skip)]
    pub filename: String,
    #[garde(length(chars, max = 100))]
    pub caption: String,
    #[garde(skip)]
    pub is_primary: bool,
    #[garde(skip)]
    pub uploaded_by: Option<String>,
}

/// Partial edit of a photo; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePhotoRequest {
    #[garde(range(min = 1))]
    #[serde(skip)]
    pub photo_id: i64,
    #[garde(length(chars, max = 100))]
    #[serde(default)]
    pub caption: Option<String>,
    #[garde(skip)]
    #[serde(default)]
    pub is_primary: Option<bool>,
}

/// Maps sniffed image content to a stored file extension
fn photo_extension(content: &[u8], filename: &str) -> DomainResult<&'static str> {
    match image::guess_format(content) {
        Ok(ImageFormat::Jpeg) => Ok("jpg"),
        Ok(ImageFormat::Png) => Ok("png"),
        Ok(ImageFormat::Gif) => Ok("gif"),
        Ok(ImageFormat::WebP) => Ok("webp"),
        _ => Err(DomainError::ValidationError(format!(
            "{} is not a JPEG, PNG, GIF or WebP image",
            if filename.is_empty() { "Photo" } else { filename }
        ))),
    }
}

/// Domain service for animal photos
pub struct PhotoService {
    photo_repository: Arc<dyn PhotoRepository>,
    animal_repository: Arc<dyn AnimalRepository>,
    media_store: Arc<dyn MediaStore>,
}

impl PhotoService {
    pub fn new(
        photo_repository: Arc<dyn PhotoRepository>,
        animal_repository: Arc<dyn AnimalRepository>,
        media_store: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            photo_repository,
            animal_repository,
            media_store,
        }
    }

    /// Store the image file, then record it. The file is removed again when
    /// the record cannot be written.
    #[instrument(skip(self, request), fields(animal_id = request.animal_id, size = request.content.len(), is_primary = request.is_primary))]
    pub async fn add_photo(&self, request: AddPhotoRequest) -> DomainResult<AnimalPhoto> {
        common::garde::validate_struct(&request)?;

        if request.content.is_empty() {
            return Err(DomainError::ValidationError(
                "Photo content is empty".to_string(),
            ));
        }
        if request.content.len() > MAX_PHOTO_BYTES {
            return Err(DomainError::ValidationError(format!(
                "Photo exceeds {} bytes",
                MAX_PHOTO_BYTES
            )));
        }
        let extension = photo_extension(&request.content, &request.filename)?;

        self.animal_repository
            .get_animal(GetAnimalRepoInput {
                animal_id: request.animal_id,
            })
            .await?
            .ok_or_else(|| {
                DomainError::AnimalNotFound(format!("Animal not found: {}", request.animal_id))
            })?;

        let key = format!(
            "animal_photos/{}/{}.{}",
            request.animal_id,
            xid::new(),
            extension
        );

        self.media_store
            .upload(&key, request.content)
            .await
            .map_err(DomainError::RepositoryError)?;
        debug!(key = %key, "stored photo file");

        let result = self
            .photo_repository
            .create_photo(CreatePhotoRepoInput {
                animal_id: request.animal_id,
                image: key.clone(),
                is_primary: request.is_primary,
                caption: request.caption.trim().to_string(),
                uploaded_by: request.uploaded_by,
            })
            .await;

        match result {
            Ok(photo) => {
                info!(photo_id = photo.id, "Photo added successfully");
                Ok(photo)
            }
            Err(e) => {
                if let Err(cleanup) = self.media_store.delete(&key).await {
                    warn!(key = %key, error = %cleanup, "failed to remove orphaned photo file");
                }
                Err(e)
            }
        }
    }

    /// Primary first, then newest first
    pub async fn list_photos(&self, animal_id: i64) -> DomainResult<Vec<AnimalPhoto>> {
        debug!(animal_id, "Listing photos");
        self.photo_repository
            .list_photos(ListPhotosRepoInput { animal_id })
            .await
    }

    /// Edit caption or primary flag. Making a photo primary demotes the
    /// animal's previous primary photo.
    #[instrument(skip(self, request), fields(photo_id = request.photo_id))]
    pub async fn update_photo(&self, request: UpdatePhotoRequest) -> DomainResult<AnimalPhoto> {
        common::garde::validate_struct(&request)?;

        let current = self
            .photo_repository
            .get_photo(GetPhotoRepoInput {
                photo_id: request.photo_id,
            })
            .await?
            .ok_or_else(|| {
                DomainError::PhotoNotFound(format!("Photo not found: {}", request.photo_id))
            })?;

        let photo = self
            .photo_repository
            .update_photo(UpdatePhotoRepoInput {
                photo_id: request.photo_id,
                caption: request
                    .caption
                    .map(|caption| caption.trim().to_string())
                    .unwrap_or(current.caption),
                is_primary: request.is_primary.unwrap_or(current.is_primary),
            })
            .await?;

        info!(animal_id = photo.animal_id, is_primary = photo.is_primary, "Photo updated");
        Ok(photo)
    }

    #[instrument(skip(self))]
    pub async fn delete_photo(&self, photo_id: i64) -> DomainResult<()> {
        let photo = self
            .photo_repository
            .get_photo(GetPhotoRepoInput { photo_id })
            .await?
            .ok_or_else(|| DomainError::PhotoNotFound(format!("Photo not found: {}", photo_id)))?;

        self.photo_repository
            .delete_photo(DeletePhotoRepoInput { photo_id })
            .await?;

        if let Err(e) = self.media_store.delete(&photo.image).await {
            warn!(key = %photo.image, error = %e, "failed to remove photo file");
        }

        info!(animal_id = photo.animal_id, "Photo deleted successfully");
        Ok(())
    }

    /// Site-relative URL of a stored photo
    pub fn photo_url(&self, photo: &AnimalPhoto) -> String {
        self.media_store.url(&photo.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::domain::{MockAnimalRepository, MockPhotoRepository};
    use common::media::MockMediaStore;
    use common::test_support::{sample_animal, sample_photo};

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn request(content: &'static [u8]) -> AddPhotoRequest {
        AddPhotoRequest {
            animal_id: 3,
            content: Bytes::from_static(content),
            filename: "rex.png".to_string(),
            caption: " Front ".to_string(),
            is_primary: true,
            uploaded_by: Some("staff".to_string()),
        }
    }

    fn animal_exists() -> MockAnimalRepository {
        let mut mock_repo = MockAnimalRepository::new();
        mock_repo
            .expect_get_animal()
            .returning(|input| Ok(Some(sample_animal(input.animal_id, "123456789012345"))));
        mock_repo
    }

    #[test]
    fn test_photo_extension_sniffing() {
        assert_eq!(photo_extension(PNG_HEADER, "").unwrap(), "png");
        assert_eq!(
            photo_extension(b"\xFF\xD8\xFF\xE0\0\x10JFIF", "").unwrap(),
            "jpg"
        );
        match photo_extension(b"plain text", "notes.txt") {
            Err(DomainError::ValidationError(message)) => assert!(message.starts_with("notes.txt")),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add_photo_uploads_then_records() {
        let mut mock_photos = MockPhotoRepository::new();
        let mut mock_media = MockMediaStore::new();

        mock_media
            .expect_upload()
            .withf(|key, _| key.starts_with("animal_photos/3/") && key.ends_with(".png"))
            .times(1)
            .returning(|_, _| Ok(()));
        mock_photos
            .expect_create_photo()
            .withf(|input| input.animal_id == 3 && input.is_primary && input.caption == "Front")
            .times(1)
            .return_once(|input| {
                Ok(AnimalPhoto {
                    caption: input.caption,
                    ..sample_photo(8, input.animal_id, &input.image, input.is_primary)
                })
            });

        let service = PhotoService::new(
            Arc::new(mock_photos),
            Arc::new(animal_exists()),
            Arc::new(mock_media),
        );

        let photo = service.add_photo(request(PNG_HEADER)).await.unwrap();
        assert_eq!(photo.id, 8);
        assert!(photo.image.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_add_photo_cleans_up_file_on_record_failure() {
        let mut mock_photos = MockPhotoRepository::new();
        let mut mock_media = MockMediaStore::new();

        mock_media
            .expect_upload()
            .times(1)
            .returning(|_, _| Ok(()));
        mock_photos
            .expect_create_photo()
            .times(1)
            .return_once(|_| Err(DomainError::RepositoryError(anyhow::anyhow!("deadlock"))));
        mock_media
            .expect_delete()
            .withf(|key| key.starts_with("animal_photos/3/"))
            .times(1)
            .returning(|_| Ok(()));

        let service = PhotoService::new(
            Arc::new(mock_photos),
            Arc::new(animal_exists()),
            Arc::new(mock_media),
        );

        let result = service.add_photo(request(PNG_HEADER)).await;
        assert!(matches!(result, Err(DomainError::RepositoryError(_))));
    }

    #[tokio::test]
    async fn test_add_photo_rejects_non_images_and_unknown_animal() {
        let service = PhotoService::new(
            Arc::new(MockPhotoRepository::new()),
            Arc::new(MockAnimalRepository::new()),
            Arc::new(MockMediaStore::new()),
        );
        let result = service.add_photo(request(b"not an image")).await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
        let result = service.add_photo(request(b"")).await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));

        let mut mock_repo = MockAnimalRepository::new();
        mock_repo
            .expect_get_animal()
            .times(1)
            .return_once(|_| Ok(None));
        let service = PhotoService::new(
            Arc::new(MockPhotoRepository::new()),
            Arc::new(mock_repo),
            Arc::new(MockMediaStore::new()),
        );
        let result = service.add_photo(request(PNG_HEADER)).await;
        assert!(matches!(result, Err(DomainError::AnimalNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_photo() {
        let mut mock_photos = MockPhotoRepository::new();
        let mut mock_media = MockMediaStore::new();

        mock_photos
            .expect_get_photo()
            .times(1)
            .return_once(|_| Ok(Some(sample_photo(5, 3, "animal_photos/3/x.jpg", false))));
        mock_photos
            .expect_delete_photo()
            .withf(|input| input.photo_id == 5)
            .times(1)
            .return_once(|_| Ok(()));
        mock_media
            .expect_delete()
            .withf(|key| key == "animal_photos/3/x.jpg")
            .times(1)
            .returning(|_| Ok(()));

        let service = PhotoService::new(
            Arc::new(mock_photos),
            Arc::new(MockAnimalRepository::new()),
            Arc::new(mock_media),
        );
        assert!(service.delete_photo(5).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_photo() {
        let mut mock_photos = MockPhotoRepository::new();
        mock_photos
            .expect_get_photo()
            .times(1)
            .return_once(|_| Ok(None));

        let service = PhotoService::new(
            Arc::new(mock_photos),
            Arc::new(MockAnimalRepository::new()),
            Arc::new(MockMediaStore::new()),
        );
        let result = service.delete_photo(5).await;
        assert!(matches!(result, Err(DomainError::PhotoNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_photo_keeps_absent_fields() {
        let mut mock_photos = MockPhotoRepository::new();
        mock_photos.expect_get_photo().times(1).return_once(|_| {
            Ok(Some(AnimalPhoto {
                caption: "Front".to_string(),
                ..sample_photo(5, 3, "animal_photos/3/x.jpg", false)
            }))
        });
        mock_photos
            .expect_update_photo()
            .withf(|input| input.photo_id == 5 && input.is_primary && input.caption == "Front")
            .times(1)
            .return_once(|input| {
                Ok(AnimalPhoto {
                    caption: input.caption,
                    ..sample_photo(5, 3, "animal_photos/3/x.jpg", input.is_primary)
                })
            });

        let service = PhotoService::new(
            Arc::new(mock_photos),
            Arc::new(MockAnimalRepository::new()),
            Arc::new(MockMediaStore::new()),
        );
        let photo = service
            .update_photo(UpdatePhotoRequest {
                photo_id: 5,
                caption: None,
                is_primary: Some(true),
            })
            .await
            .unwrap();
        assert!(photo.is_primary);
        assert_eq!(photo.caption, "Front");
    }

    #[tokio::test]
    async fn test_update_photo_validation_and_missing() {
        let mut mock_photos = MockPhotoRepository::new();
        mock_photos
            .expect_get_photo()
            .times(1)
            .return_once(|_| Ok(None));

        let service = PhotoService::new(
            Arc::new(mock_photos),
            Arc::new(MockAnimalRepository::new()),
            Arc::new(MockMediaStore::new()),
        );

        let too_long = service
            .update_photo(UpdatePhotoRequest {
                photo_id: 5,
                caption: Some("x".repeat(101)),
                is_primary: None,
            })
            .await;
        assert!(matches!(too_long, Err(DomainError::ValidationError(_))));

        let missing = service
            .update_photo(UpdatePhotoRequest {
                photo_id: 5,
                ..Default::default()
            })
            .await;
        assert!(matches!(missing, Err(DomainError::PhotoNotFound(_))));
    }
}
