use super::{ApiJson, ApiPath, ShelterApiServices, StaffUser, VaccinationDto};
use crate::domain::RecordVaccinationRequest;
use axum::Json;
use axum::extract::State;
use common::http::ApiError;
use http::StatusCode;
use serde_json::{Value, json};
use tracing::instrument;

#[instrument(name = "ListVaccinations", skip(services))]
pub(crate) async fn list_vaccinations(
    State(services): State<ShelterApiServices>,
    ApiPath(animal_id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    services.animal_service.get_animal(animal_id).await?;

    let vaccinations: Vec<VaccinationDto> = services
        .vaccination_service
        .list_vaccinations(animal_id)
        .await?
        .into_iter()
        .map(VaccinationDto::from)
        .collect();

    Ok(Json(json!({ "success": true, "vaccinations": vaccinations })))
}

#[instrument(name = "RecordVaccination", skip(services, user, request))]
pub(crate) async fn record_vaccination(
    State(services): State<ShelterApiServices>,
    ApiPath(animal_id): ApiPath<i64>,
    user: StaffUser,
    ApiJson(mut request): ApiJson<RecordVaccinationRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    request.animal_id = animal_id;
    request.created_by = user.into_inner();

    let vaccination = services
        .vaccination_service
        .record_vaccination(request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "vaccination": VaccinationDto::from(vaccination) })),
    ))
}
