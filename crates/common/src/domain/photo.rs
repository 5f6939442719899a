use crate::domain::result::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Photo attached to an animal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalPhoto {
    pub id: i64,
    pub animal_id: i64,
    /// Media key of the stored image
    pub image: String,
    pub is_primary: bool,
    pub caption: String,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: Option<String>,
}

/// Picks the representative photo: the first photo flagged primary,
/// otherwise the earliest inserted photo.
pub fn select_display_photo(photos: &[AnimalPhoto]) -> Option<&AnimalPhoto> {
    photos
        .iter()
        .filter(|photo| photo.is_primary)
        .min_by_key(|photo| photo.id)
        .or_else(|| photos.iter().min_by_key(|photo| photo.id))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePhotoRepoInput {
    pub animal_id: i64,
    pub image: String,
    pub is_primary: bool,
    pub caption: String,
    pub uploaded_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPhotoRepoInput {
    pub photo_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPhotosRepoInput {
    pub animal_id: i64,
}

/// Caption and primary flag are the only editable photo fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePhotoRepoInput {
    pub photo_id: i64,
    pub caption: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePhotoRepoInput {
    pub photo_id: i64,
}

/// Repository trait for animal photo metadata
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Insert a photo; flagging it primary clears the flag on the animal's other photos
    async fn create_photo(&self, input: CreatePhotoRepoInput) -> DomainResult<AnimalPhoto>;

    async fn get_photo(&self, input: GetPhotoRepoInput) -> DomainResult<Option<AnimalPhoto>>;

    /// Primary first, then newest upload first
    async fn list_photos(&self, input: ListPhotosRepoInput) -> DomainResult<Vec<AnimalPhoto>>;

    /// Flagging a photo primary clears the flag on the animal's other photos.
    /// Fails with `PhotoNotFound` when the photo does not exist.
    async fn update_photo(&self, input: UpdatePhotoRepoInput) -> DomainResult<AnimalPhoto>;

    async fn delete_photo(&self, input: DeletePhotoRepoInput) -> DomainResult<()>;
}
