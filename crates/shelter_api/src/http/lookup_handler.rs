use super::{ApiJson, ApiPath, ApiQuery, LookupQuery, ScanBody, ShelterApiServices};
use axum::Json;
use axum::extract::State;
use common::http::ApiError;
use serde_json::{Value, json};
use tracing::instrument;

/// Staff scan: raw scanner output or a typed chip id
#[instrument(name = "ScanIdentity", skip(services, body))]
pub(crate) async fn scan_identity(
    State(services): State<ShelterApiServices>,
    ApiJson(body): ApiJson<ScanBody>,
) -> Result<Json<Value>, ApiError> {
    let view = services.lookup_service.resolve_for_staff(&body.qr_data).await?;
    Ok(Json(json!({ "success": true, "animal": view })))
}

/// Public lookup by chip id
#[instrument(name = "LookupAnimal", skip(services, query))]
pub(crate) async fn lookup_animal(
    State(services): State<ShelterApiServices>,
    ApiQuery(query): ApiQuery<LookupQuery>,
) -> Result<Json<Value>, ApiError> {
    let lookup = services
        .lookup_service
        .resolve_for_public(&query.chip_id)
        .await?;
    Ok(Json(json!({ "success": true, "animal": lookup })))
}

/// Public adoption listing
#[instrument(name = "ListAdoptable", skip(services))]
pub(crate) async fn list_adoptable(
    State(services): State<ShelterApiServices>,
) -> Result<Json<Value>, ApiError> {
    let animals = services.animal_service.list_public_animals().await?;

    let mut views = Vec::with_capacity(animals.len());
    for animal in &animals {
        views.push(services.lookup_service.public_view(animal).await?);
    }

    Ok(Json(json!({ "success": true, "animals": views })))
}

/// Public adoption detail; hidden animals are not found
#[instrument(name = "GetAdoptable", skip(services))]
pub(crate) async fn get_adoptable(
    State(services): State<ShelterApiServices>,
    ApiPath(animal_id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    let animal = services.animal_service.get_public_animal(animal_id).await?;
    let view = services.lookup_service.public_view(&animal).await?;
    Ok(Json(json!({ "success": true, "animal": view })))
}
