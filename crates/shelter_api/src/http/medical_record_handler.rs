use super::{ApiJson, ApiPath, MedicalRecordDto, ShelterApiServices, StaffUser};
use crate::domain::{AddMedicalRecordRequest, UpdateMedicalRecordRequest};
use axum::Json;
use axum::extract::State;
use common::http::ApiError;
use http::StatusCode;
use serde_json::{Value, json};
use tracing::instrument;

#[instrument(name = "ListMedicalRecords", skip(services))]
pub(crate) async fn list_medical_records(
    State(services): State<ShelterApiServices>,
    ApiPath(animal_id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    services.animal_service.get_animal(animal_id).await?;

    let records: Vec<MedicalRecordDto> = services
        .medical_record_service
        .list_records(animal_id)
        .await?
        .into_iter()
        .map(MedicalRecordDto::from)
        .collect();

    Ok(Json(json!({ "success": true, "medical_records": records })))
}

#[instrument(name = "AddMedicalRecord", skip(services, user, request))]
pub(crate) async fn add_medical_record(
    State(services): State<ShelterApiServices>,
    ApiPath(animal_id): ApiPath<i64>,
    user: StaffUser,
    ApiJson(mut request): ApiJson<AddMedicalRecordRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    request.animal_id = animal_id;
    request.created_by = user.into_inner();

    let record = services.medical_record_service.add_record(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "medical_record": MedicalRecordDto::from(record) })),
    ))
}

#[instrument(name = "GetMedicalRecord", skip(services))]
pub(crate) async fn get_medical_record(
    State(services): State<ShelterApiServices>,
    ApiPath(record_id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    let record = services.medical_record_service.get_record(record_id).await?;
    Ok(Json(
        json!({ "success": true, "medical_record": MedicalRecordDto::from(record) }),
    ))
}

/// The owning animal and author are fixed at creation
#[instrument(name = "UpdateMedicalRecord", skip(services, request))]
pub(crate) async fn update_medical_record(
    State(services): State<ShelterApiServices>,
    ApiPath(record_id): ApiPath<i64>,
    ApiJson(mut request): ApiJson<UpdateMedicalRecordRequest>,
) -> Result<Json<Value>, ApiError> {
    request.record_id = record_id;

    let record = services.medical_record_service.update_record(request).await?;
    Ok(Json(
        json!({ "success": true, "medical_record": MedicalRecordDto::from(record) }),
    ))
}

#[instrument(name = "DeleteMedicalRecord", skip(services))]
pub(crate) async fn delete_medical_record(
    State(services): State<ShelterApiServices>,
    ApiPath(record_id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    services.medical_record_service.delete_record(record_id).await?;
    Ok(Json(json!({ "success": true })))
}
