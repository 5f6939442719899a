use crate::domain::{
    AnimalPhoto, CreatePhotoRepoInput, DeletePhotoRepoInput, DomainError, DomainResult,
    GetPhotoRepoInput, ListPhotosRepoInput, PhotoRepository, UpdatePhotoRepoInput,
};
use crate::postgres::PostgresClient;
use async_trait::async_trait;
use chrono::Utc;
use tokio_postgres::Row;
use tracing::{debug, instrument};

const PHOTO_COLUMNS: &str = "id, animal_id, image, is_primary, caption, uploaded_at, uploaded_by";

fn row_to_photo(row: &Row) -> AnimalPhoto {
    AnimalPhoto {
        id: row.get(0),
        animal_id: row.get(1),
        image: row.get(2),
        is_primary: row.get(3),
        caption: row.get(4),
        uploaded_at: row.get(5),
        uploaded_by: row.get(6),
    }
}

/// PostgreSQL implementation of PhotoRepository trait
#[derive(Clone)]
pub struct PostgresPhotoRepository {
    client: PostgresClient,
}

impl PostgresPhotoRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PhotoRepository for PostgresPhotoRepository {
    #[instrument(skip(self, input), fields(animal_id = input.animal_id, is_primary = input.is_primary))]
    async fn create_photo(&self, input: CreatePhotoRepoInput) -> DomainResult<AnimalPhoto> {
        let mut conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let tx = conn
            .transaction()
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        if input.is_primary {
            tx.execute(
                "UPDATE animal_photos SET is_primary = FALSE WHERE animal_id = $1 AND is_primary",
                &[&input.animal_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;
        }

        let result = tx
            .query_one(
                &format!(
                    "INSERT INTO animal_photos (animal_id, image, is_primary, caption, uploaded_at, uploaded_by)
                     VALUES ($1, $2, $3, $4, $5, $6)
                     RETURNING {}",
                    PHOTO_COLUMNS
                ),
                &[
                    &input.animal_id,
                    &input.image,
                    &input.is_primary,
                    &input.caption,
                    &Utc::now(),
                    &input.uploaded_by,
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

        tx.commit()
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        let photo = row_to_photo(&row);
        debug!(photo_id = photo.id, "stored photo: {}", photo.image);
        Ok(photo)
    }

    #[instrument(skip(self, input), fields(photo_id = input.photo_id))]
    async fn get_photo(&self, input: GetPhotoRepoInput) -> DomainResult<Option<AnimalPhoto>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let row = conn
            .query_opt(
                &format!("SELECT {} FROM animal_photos WHERE id = $1", PHOTO_COLUMNS),
                &[&input.photo_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        Ok(row.as_ref().map(row_to_photo))
    }

    #[instrument(skip(self, input), fields(animal_id = input.animal_id))]
    async fn list_photos(&self, input: ListPhotosRepoInput) -> DomainResult<Vec<AnimalPhoto>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let rows = conn
            .query(
                &format!(
                    "SELECT {} FROM animal_photos
                     WHERE animal_id = $1
                     ORDER BY is_primary DESC, uploaded_at DESC, id DESC",
                    PHOTO_COLUMNS
                ),
                &[&input.animal_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        Ok(rows.iter().map(row_to_photo).collect())
    }

    #[instrument(skip(self, input), fields(photo_id = input.photo_id, is_primary = input.is_primary))]
    async fn update_photo(&self, input: UpdatePhotoRepoInput) -> DomainResult<AnimalPhoto> {
        let mut conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let tx = conn
            .transaction()
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        let animal_id: i64 = tx
            .query_opt(
                "SELECT animal_id FROM animal_photos WHERE id = $1 FOR UPDATE",
                &[&input.photo_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?
            .ok_or_else(|| {
                DomainError::PhotoNotFound(format!("Photo not found: {}", input.photo_id))
            })?
            .get(0);

        if input.is_primary {
            tx.execute(
                "UPDATE animal_photos SET is_primary = FALSE
                 WHERE animal_id = $1 AND id <> $2 AND is_primary",
                &[&animal_id, &input.photo_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;
        }

        let row = tx
            .query_one(
                &format!(
                    "UPDATE animal_photos SET caption = $2, is_primary = $3
                     WHERE id = $1
                     RETURNING {}",
                    PHOTO_COLUMNS
                ),
                &[&input.photo_id, &input.caption, &input.is_primary],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        let photo = row_to_photo(&row);
        debug!(photo_id = photo.id, animal_id, "updated photo");
        Ok(photo)
    }

    #[instrument(skip(self, input), fields(photo_id = input.photo_id))]
    async fn delete_photo(&self, input: DeletePhotoRepoInput) -> DomainResult<()> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let deleted = conn
            .execute("DELETE FROM animal_photos WHERE id = $1", &[&input.photo_id])
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        if deleted == 0 {
            return Err(DomainError::PhotoNotFound(format!(
                "Photo not found: {}",
                input.photo_id
            )));
        }

        debug!(photo_id = input.photo_id, "deleted photo");
        Ok(())
    }
}
