use super::{
    AnimalDto, ApiJson, ApiPath, ApiQuery, CreateAnimalBody, RegenerateIdentityBody,
    ShelterApiServices, StaffUser, VisibilityBody,
};
use crate::domain::{AnimalFields, CreateAnimalRequest, ListAnimalsRequest, UpdateAnimalRequest};
use axum::Json;
use axum::extract::State;
use common::domain::Animal;
use common::http::ApiError;
use http::StatusCode;
use serde_json::{Value, json};
use tracing::{debug, instrument};

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn to_dto(services: &ShelterApiServices, animal: Animal) -> AnimalDto {
    let identity_image_url = services.animal_service.identity_image_url(&animal);
    AnimalDto::new(animal, identity_image_url)
}

#[instrument(name = "ListAnimals", skip(services, query))]
pub(crate) async fn list_animals(
    State(services): State<ShelterApiServices>,
    ApiQuery(mut query): ApiQuery<ListAnimalsRequest>,
) -> Result<Json<Value>, ApiError> {
    query.search = non_blank(query.search);
    query.shelter = non_blank(query.shelter);

    let animals: Vec<AnimalDto> = services
        .animal_service
        .list_animals(query)
        .await?
        .into_iter()
        .map(|animal| to_dto(&services, animal))
        .collect();

    Ok(Json(json!({ "success": true, "count": animals.len(), "animals": animals })))
}

#[instrument(name = "CreateAnimal", skip(services, user, body), fields(chip_id = %body.chip_id))]
pub(crate) async fn create_animal(
    State(services): State<ShelterApiServices>,
    user: StaffUser,
    ApiJson(body): ApiJson<CreateAnimalBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let animal = services
        .animal_service
        .create_animal(CreateAnimalRequest {
            chip_id: body.chip_id.trim().to_string(),
            fields: body.fields,
            created_by: user.into_inner(),
        })
        .await?;

    debug!(animal_id = animal.id, "Animal created");
    let dto = to_dto(&services, animal);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "animal": dto })),
    ))
}

#[instrument(name = "GetAnimal", skip(services))]
pub(crate) async fn get_animal(
    State(services): State<ShelterApiServices>,
    ApiPath(animal_id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    let animal = services.animal_service.get_animal(animal_id).await?;
    Ok(Json(json!({ "success": true, "animal": to_dto(&services, animal) })))
}

/// Replaces the editable fields; a `chip_id` in the body is ignored
#[instrument(name = "UpdateAnimal", skip(services, fields))]
pub(crate) async fn update_animal(
    State(services): State<ShelterApiServices>,
    ApiPath(animal_id): ApiPath<i64>,
    ApiJson(fields): ApiJson<AnimalFields>,
) -> Result<Json<Value>, ApiError> {
    let animal = services
        .animal_service
        .update_animal(UpdateAnimalRequest { animal_id, fields })
        .await?;
    Ok(Json(json!({ "success": true, "animal": to_dto(&services, animal) })))
}

#[instrument(name = "DeleteAnimal", skip(services))]
pub(crate) async fn delete_animal(
    State(services): State<ShelterApiServices>,
    ApiPath(animal_id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    services.animal_service.delete_animal(animal_id).await?;
    Ok(Json(json!({ "success": true })))
}

#[instrument(name = "AnimalStats", skip(services))]
pub(crate) async fn animal_stats(
    State(services): State<ShelterApiServices>,
) -> Result<Json<Value>, ApiError> {
    let stats = services.animal_service.animal_stats().await?;
    Ok(Json(json!({ "success": true, "stats": stats })))
}

#[instrument(name = "RegenerateIdentity", skip(services, body), fields(count = body.animal_ids.len()))]
pub(crate) async fn regenerate_identity(
    State(services): State<ShelterApiServices>,
    ApiJson(body): ApiJson<RegenerateIdentityBody>,
) -> Result<Json<Value>, ApiError> {
    let regenerated = services
        .animal_service
        .regenerate_identity_images(body.animal_ids)
        .await?;
    Ok(Json(json!({ "success": true, "regenerated": regenerated })))
}

#[instrument(name = "SetVisibility", skip(services, body), fields(count = body.animal_ids.len(), public = body.public_visibility))]
pub(crate) async fn set_visibility(
    State(services): State<ShelterApiServices>,
    ApiJson(body): ApiJson<VisibilityBody>,
) -> Result<Json<Value>, ApiError> {
    let updated = services
        .animal_service
        .set_public_visibility(body.animal_ids, body.public_visibility)
        .await?;
    Ok(Json(json!({ "success": true, "updated": updated })))
}
