use crate::http::{MediaServeConfig, ShelterApiServices, run_shelter_http_server};
use common::http::HttpServerConfig;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// HTTP-facing module: owns the services and the server configuration
pub struct ShelterApi {
    services: ShelterApiServices,
    config: HttpServerConfig,
    media: MediaServeConfig,
}

impl ShelterApi {
    pub fn new(
        services: ShelterApiServices,
        config: HttpServerConfig,
        media: MediaServeConfig,
    ) -> Self {
        debug!("Initializing shelter API module");
        Self {
            services,
            config,
            media,
        }
    }

    pub fn into_runner_process(
        self,
    ) -> impl FnOnce(
        CancellationToken,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + Send>,
    > {
        move |ctx| {
            Box::pin(async move {
                run_shelter_http_server(self.config, self.media, self.services, ctx).await
            })
        }
    }
}
