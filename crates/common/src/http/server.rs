//! Reusable HTTP server with access logging and graceful shutdown.
//!
//! # Example
//!
//! ```ignore
//! use common::http::{HttpServerConfig, run_http_server};
//!
//! let config = HttpServerConfig {
//!     host: "0.0.0.0".to_string(),
//!     port: 8000,
//!     ..Default::default()
//! };
//!
//! run_http_server(config, router, cancellation_token).await?;
//! ```

use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{HttpLoggingConfig, HttpLoggingLayer};

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Access logging configuration.
    pub logging_config: HttpLoggingConfig,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            logging_config: HttpLoggingConfig::default(),
        }
    }
}

/// Serve `router` until `cancellation_token` is cancelled.
///
/// The access logging layer is always applied on top of the router.
pub async fn run_http_server(
    config: HttpServerConfig,
    router: Router,
    cancellation_token: CancellationToken,
) -> Result<(), anyhow::Error> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid server address {}:{}", config.host, config.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(address = %addr, "HTTP server listening");

    let app = router.layer(HttpLoggingLayer::new(config.logging_config));

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancellation_token.cancelled().await;
            debug!("HTTP server shutdown signal received");
        })
        .await
        .context("HTTP server failed")?;

    info!("HTTP server stopped");
    Ok(())
}
