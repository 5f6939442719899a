mod config;
mod shutdown;

use common::domain::{
    AnimalRepository, MedicalRecordRepository, PhotoRepository, VaccinationRepository,
};
use common::http::{HttpLoggingConfig, HttpServerConfig};
use common::identity::IdentitySettings;
use common::media::{FilesystemMediaStore, MediaStore};
use common::postgres::{
    MigrationRunner, PostgresAnimalRepository, PostgresClient, PostgresConfig,
    PostgresMedicalRecordRepository, PostgresPhotoRepository, PostgresVaccinationRepository,
};
use common::telemetry::{LogFormat, TelemetryConfig, init_telemetry};
use crate::config::ServiceConfig;
use shelter_api::domain::{
    AnimalService, ExportService, IdentityService, LookupService, MedicalRecordService,
    PhotoService, VaccinationService,
};
use shelter_api::http::{MediaServeConfig, ShelterApiServices};
use shelter_api::shelter_api::ShelterApi;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    let config = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let log_format: LogFormat = match config.log_format.parse() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("Invalid log format: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_telemetry(&TelemetryConfig {
        service_name: config.service_name.clone(),
        log_level: config.log_level.clone(),
        log_format,
    }) {
        eprintln!("Failed to initialize telemetry: {}", e);
        std::process::exit(1);
    }

    info!(
        http_port = config.http_port,
        media_root = %config.media_root,
        "Starting shelter-all-in-one service"
    );
    debug!("Configuration: {:?}", config);

    let postgres_repos = match initialize_postgres(&config).await {
        Ok(repos) => repos,
        Err(e) => {
            error!("Failed to initialize PostgreSQL: {:#}", e);
            std::process::exit(1);
        }
    };

    let media_store: Arc<dyn MediaStore> = Arc::new(FilesystemMediaStore::new(
        &config.media_root,
        &config.media_url_prefix,
    ));
    let settings = IdentitySettings::new(
        config.domain.as_deref(),
        config.organization_name.as_deref(),
    );
    info!(base_url = %settings.base_url(), "Identity settings resolved");

    // Domain services
    let identity_service = Arc::new(IdentityService::new(
        postgres_repos.animal.clone(),
        media_store.clone(),
        settings.clone(),
    ));
    let services = ShelterApiServices {
        animal_service: Arc::new(AnimalService::new(
            postgres_repos.animal.clone(),
            postgres_repos.photo.clone(),
            media_store.clone(),
            identity_service,
        )),
        lookup_service: Arc::new(LookupService::new(
            postgres_repos.animal.clone(),
            postgres_repos.photo.clone(),
            media_store.clone(),
            settings,
        )),
        photo_service: Arc::new(PhotoService::new(
            postgres_repos.photo.clone(),
            postgres_repos.animal.clone(),
            media_store.clone(),
        )),
        medical_record_service: Arc::new(MedicalRecordService::new(
            postgres_repos.medical_record.clone(),
        )),
        vaccination_service: Arc::new(VaccinationService::new(
            postgres_repos.vaccination.clone(),
        )),
        export_service: Arc::new(ExportService::new(
            postgres_repos.animal,
            postgres_repos.medical_record,
            postgres_repos.vaccination,
            postgres_repos.photo,
            media_store,
        )),
    };

    let http_config = HttpServerConfig {
        host: config.http_host.clone(),
        port: config.http_port,
        logging_config: HttpLoggingConfig::new(config.ignored_paths()),
    };
    let media_config = MediaServeConfig {
        root: PathBuf::from(&config.media_root),
        url_prefix: config.media_url_prefix.clone(),
    };

    let shelter_api = ShelterApi::new(services, http_config, media_config);

    let token = CancellationToken::new();
    shutdown::spawn_signal_handler(token.clone());

    let process = shelter_api.into_runner_process();
    match process(token.clone()).await {
        Ok(()) => info!("Shelter API stopped"),
        Err(e) => {
            error!("Shelter API failed: {:#}", e);
            token.cancel();
            std::process::exit(1);
        }
    }
}

struct PostgresRepositories {
    animal: Arc<dyn AnimalRepository>,
    photo: Arc<dyn PhotoRepository>,
    medical_record: Arc<dyn MedicalRecordRepository>,
    vaccination: Arc<dyn VaccinationRepository>,
}

async fn initialize_postgres(config: &ServiceConfig) -> anyhow::Result<PostgresRepositories> {
    info!("Initializing PostgreSQL...");
    let postgres_client = PostgresClient::new(&PostgresConfig {
        host: config.postgres_host.clone(),
        port: config.postgres_port,
        database: config.postgres_database.clone(),
        username: config.postgres_username.clone(),
        password: config.postgres_password.clone(),
        max_pool_size: config.postgres_max_pool_size,
        ..Default::default()
    })?;
    postgres_client.ping().await?;

    let applied = MigrationRunner::new(postgres_client.clone())
        .run_migrations()
        .await?;
    info!(applied, "PostgreSQL migrations complete");

    Ok(PostgresRepositories {
        animal: Arc::new(PostgresAnimalRepository::new(postgres_client.clone())),
        photo: Arc::new(PostgresPhotoRepository::new(postgres_client.clone())),
        medical_record: Arc::new(PostgresMedicalRecordRepository::new(
            postgres_client.clone(),
        )),
        vaccination: Arc::new(PostgresVaccinationRepository::new(postgres_client)),
    })
}
