use crate::postgres::PostgresConfig;
use anyhow::{Context, Result};
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use std::time::Duration;
use tokio_postgres::NoTls;
use tracing::debug;

/// Pooled connection handle shared by every repository
#[derive(Clone)]
pub struct PostgresClient {
    pool: Pool,
}

impl PostgresClient {
    /// Builds the pool; no connection is opened until first use
    pub fn new(config: &PostgresConfig) -> Result<Self> {
        let mut cfg = Config::new();
        cfg.host = Some(config.host.clone());
        cfg.port = Some(config.port);
        cfg.dbname = Some(config.database.clone());
        cfg.user = Some(config.username.clone());
        cfg.password = Some(config.password.clone());
        cfg.application_name = Some(config.application_name.clone());
        cfg.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .with_context(|| {
                format!(
                    "failed to create pool for {}:{}/{}",
                    config.host, config.port, config.database
                )
            })?;
        pool.resize(config.max_pool_size);

        debug!(
            host = %config.host,
            database = %config.database,
            max_pool_size = config.max_pool_size,
            "postgres pool created"
        );
        Ok(Self { pool })
    }

    /// Round-trips a trivial query to verify connectivity
    pub async fn ping(&self) -> Result<()> {
        let client = self.get_connection().await?;
        client
            .execute("SELECT 1", &[])
            .await
            .context("postgres ping failed")?;
        debug!("postgres connection verified");
        Ok(())
    }

    pub async fn get_connection(&self) -> Result<deadpool_postgres::Client> {
        self.pool
            .get()
            .await
            .context("failed to acquire postgres connection")
    }
}
