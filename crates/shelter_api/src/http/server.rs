use super::{
    animal_handler, export_handler, lookup_handler, medical_record_handler, photo_handler,
    vaccination_handler,
};
use crate::domain::{
    AnimalService, ExportService, LookupService, MedicalRecordService, PhotoService,
    VaccinationService,
};
use axum::Router;
use axum::routing::{get, post, put};
use common::http::{HttpServerConfig, run_http_server};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeDir;
use tracing::info;

/// Services shared by every handler
#[derive(Clone)]
pub struct ShelterApiServices {
    pub animal_service: Arc<AnimalService>,
    pub lookup_service: Arc<LookupService>,
    pub photo_service: Arc<PhotoService>,
    pub medical_record_service: Arc<MedicalRecordService>,
    pub vaccination_service: Arc<VaccinationService>,
    pub export_service: Arc<ExportService>,
}

/// Where uploaded and generated media is read from, and the URL it is served under
#[derive(Debug, Clone)]
pub struct MediaServeConfig {
    pub root: PathBuf,
    pub url_prefix: String,
}

impl Default for MediaServeConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("media"),
            url_prefix: "/media/".to_string(),
        }
    }
}

/// JSON API routes
pub fn build_shelter_api_routes(services: ShelterApiServices) -> Router {
    Router::new()
        .route("/api/v1/qr/scan/", post(lookup_handler::scan_identity))
        .route("/api/v1/qr/lookup/", get(lookup_handler::lookup_animal))
        .route(
            "/api/v1/animals/",
            get(animal_handler::list_animals).post(animal_handler::create_animal),
        )
        .route("/api/v1/animals/stats/", get(animal_handler::animal_stats))
        .route("/api/v1/animals/export/", get(export_handler::export_animals))
        .route(
            "/api/v1/animals/export/vaccinations/",
            get(export_handler::export_vaccinations),
        )
        .route(
            "/api/v1/animals/regenerate_identity/",
            post(animal_handler::regenerate_identity),
        )
        .route(
            "/api/v1/animals/visibility/",
            post(animal_handler::set_visibility),
        )
        .route(
            "/api/v1/animals/{id}/",
            get(animal_handler::get_animal)
                .put(animal_handler::update_animal)
                .delete(animal_handler::delete_animal),
        )
        .route(
            "/api/v1/animals/{id}/photos/",
            get(photo_handler::list_photos).post(photo_handler::add_photo),
        )
        .route(
            "/api/v1/photos/{id}/",
            put(photo_handler::update_photo)
                .patch(photo_handler::update_photo)
                .delete(photo_handler::delete_photo),
        )
        .route(
            "/api/v1/animals/{id}/medical_records/",
            get(medical_record_handler::list_medical_records)
                .post(medical_record_handler::add_medical_record),
        )
        .route(
            "/api/v1/medical_records/{id}/",
            get(medical_record_handler::get_medical_record)
                .put(medical_record_handler::update_medical_record)
                .delete(medical_record_handler::delete_medical_record),
        )
        .route(
            "/api/v1/animals/{id}/vaccinations/",
            get(vaccination_handler::list_vaccinations)
                .post(vaccination_handler::record_vaccination),
        )
        .route("/api/v1/adopt/", get(lookup_handler::list_adoptable))
        .route("/api/v1/adopt/{id}/", get(lookup_handler::get_adoptable))
        .with_state(services)
}

/// API routes plus static media
pub fn build_shelter_router(services: ShelterApiServices, media: &MediaServeConfig) -> Router {
    let prefix = format!("/{}", media.url_prefix.trim_matches('/'));
    build_shelter_api_routes(services).nest_service(&prefix, ServeDir::new(&media.root))
}

/// Run the HTTP server with graceful shutdown
pub async fn run_shelter_http_server(
    config: HttpServerConfig,
    media: MediaServeConfig,
    services: ShelterApiServices,
    cancellation_token: CancellationToken,
) -> Result<(), anyhow::Error> {
    info!(
        media_root = %media.root.display(),
        media_prefix = %media.url_prefix,
        "Starting shelter HTTP API"
    );

    let router = build_shelter_router(services, &media);
    run_http_server(config, router, cancellation_token).await
}
