use super::{AddPhotoBody, ApiJson, ApiPath, PhotoDto, ShelterApiServices, StaffUser};
use crate::domain::{AddPhotoRequest, UpdatePhotoRequest};
use axum::Json;
use axum::extract::State;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use common::domain::DomainError;
use common::http::ApiError;
use http::StatusCode;
use serde_json::{Value, json};
use tracing::instrument;

#[instrument(name = "ListPhotos", skip(services))]
pub(crate) async fn list_photos(
    State(services): State<ShelterApiServices>,
    ApiPath(animal_id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    services.animal_service.get_animal(animal_id).await?;

    let photos: Vec<PhotoDto> = services
        .photo_service
        .list_photos(animal_id)
        .await?
        .into_iter()
        .map(|photo| {
            let url = services.photo_service.photo_url(&photo);
            PhotoDto::new(photo, url)
        })
        .collect();

    Ok(Json(json!({ "success": true, "photos": photos })))
}

#[instrument(name = "AddPhoto", skip(services, user, body), fields(filename = %body.filename))]
pub(crate) async fn add_photo(
    State(services): State<ShelterApiServices>,
    ApiPath(animal_id): ApiPath<i64>,
    user: StaffUser,
    ApiJson(body): ApiJson<AddPhotoBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let content = STANDARD
        .decode(body.content_base64.trim())
        .map_err(|e| DomainError::ValidationError(format!("Invalid base64 image content: {}", e)))?;

    let photo = services
        .photo_service
        .add_photo(AddPhotoRequest {
            animal_id,
            content: Bytes::from(content),
            filename: body.filename,
            caption: body.caption,
            is_primary: body.is_primary,
            uploaded_by: user.into_inner(),
        })
        .await?;

    let url = services.photo_service.photo_url(&photo);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "photo": PhotoDto::new(photo, url) })),
    ))
}

/// Serves both PUT and PATCH; omitted fields keep their stored value
#[instrument(name = "UpdatePhoto", skip(services, request))]
pub(crate) async fn update_photo(
    State(services): State<ShelterApiServices>,
    ApiPath(photo_id): ApiPath<i64>,
    ApiJson(mut request): ApiJson<UpdatePhotoRequest>,
) -> Result<Json<Value>, ApiError> {
    request.photo_id = photo_id;

    let photo = services.photo_service.update_photo(request).await?;
    let url = services.photo_service.photo_url(&photo);
    Ok(Json(
        json!({ "success": true, "photo": PhotoDto::new(photo, url) }),
    ))
}

#[instrument(name = "DeletePhoto", skip(services))]
pub(crate) async fn delete_photo(
    State(services): State<ShelterApiServices>,
    ApiPath(photo_id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    services.photo_service.delete_photo(photo_id).await?;
    Ok(Json(json!({ "success": true })))
}
