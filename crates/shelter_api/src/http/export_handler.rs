use super::{ApiQuery, ShelterApiServices};
use crate::domain::{ExportFile, ListAnimalsRequest, XLSX_CONTENT_TYPE};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use common::http::ApiError;
use http::header;
use tracing::instrument;

fn attachment(file: ExportFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.content,
    )
        .into_response()
}

/// Full workbook for the animals matching the listing filters
#[instrument(name = "ExportAnimals", skip(services, filter))]
pub(crate) async fn export_animals(
    State(services): State<ShelterApiServices>,
    ApiQuery(filter): ApiQuery<ListAnimalsRequest>,
) -> Result<Response, ApiError> {
    let file = services.export_service.export_animals(filter).await?;
    Ok(attachment(file))
}

#[instrument(name = "ExportVaccinations", skip(services, filter))]
pub(crate) async fn export_vaccinations(
    State(services): State<ShelterApiServices>,
    ApiQuery(filter): ApiQuery<ListAnimalsRequest>,
) -> Result<Response, ApiError> {
    let file = services.export_service.export_vaccinations(filter).await?;
    Ok(attachment(file))
}
