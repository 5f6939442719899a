use serde::{Deserialize, Serialize};

/// Connection settings for the registry database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub max_pool_size: usize,
    /// Reported to the server as `application_name`
    pub application_name: String,
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "shelter_registry".to_string(),
            username: "postgres".to_string(),
            password: "postgres".to_string(),
            max_pool_size: 10,
            application_name: "shelter_registry".to_string(),
            connect_timeout_secs: 5,
        }
    }
}
