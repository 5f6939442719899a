use crate::postgres::PostgresClient;
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Schema migrations compiled into the binary, applied in order
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "0001_create_animals",
        include_str!("../../migrations/postgres/0001_create_animals.sql"),
    ),
    (
        "0002_create_animal_children",
        include_str!("../../migrations/postgres/0002_create_animal_children.sql"),
    ),
];

/// Applies embedded SQL migrations, recording each applied version in
/// `schema_migrations`. Every migration runs in its own transaction.
pub struct MigrationRunner {
    client: PostgresClient,
}

impl MigrationRunner {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }

    /// Runs all pending migrations and returns how many were applied
    pub async fn run_migrations(&self) -> Result<usize> {
        let mut conn = self.client.get_connection().await?;

        conn.batch_execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version TEXT PRIMARY KEY,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
        )
        .await
        .context("failed to create schema_migrations table")?;

        let mut applied = 0;
        for (version, sql) in MIGRATIONS {
            let already = conn
                .query_opt(
                    "SELECT version FROM schema_migrations WHERE version = $1",
                    &[version],
                )
                .await
                .context("failed to read schema_migrations")?;

            if already.is_some() {
                debug!(version = %version, "migration already applied");
                continue;
            }

            let tx = conn.transaction().await?;
            tx.batch_execute(sql)
                .await
                .with_context(|| format!("migration {} failed", version))?;
            tx.execute(
                "INSERT INTO schema_migrations (version) VALUES ($1)",
                &[version],
            )
            .await?;
            tx.commit().await?;

            info!(version = %version, "applied migration");
            applied += 1;
        }

        info!(applied, "migrations complete");
        Ok(applied)
    }
}
