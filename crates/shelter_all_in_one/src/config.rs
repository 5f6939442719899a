use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format (json, pretty)
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Service name attached to telemetry
    #[serde(default = "default_service_name")]
    pub service_name: String,

    // HTTP configuration
    #[serde(default = "default_http_host")]
    pub http_host: String,

    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Path prefixes left out of access logs (comma-separated)
    #[serde(default = "default_http_ignored_paths")]
    pub http_ignored_paths: String,

    // PostgreSQL configuration
    #[serde(default = "default_postgres_host")]
    pub postgres_host: String,

    #[serde(default = "default_postgres_port")]
    pub postgres_port: u16,

    #[serde(default = "default_postgres_database")]
    pub postgres_database: String,

    #[serde(default = "default_postgres_username")]
    pub postgres_username: String,

    #[serde(default = "default_postgres_password")]
    pub postgres_password: String,

    #[serde(default = "default_postgres_max_pool_size")]
    pub postgres_max_pool_size: usize,

    // Media configuration
    /// Directory holding uploaded photos and generated identity images
    #[serde(default = "default_media_root")]
    pub media_root: String,

    /// URL prefix the media directory is served under
    #[serde(default = "default_media_url_prefix")]
    pub media_url_prefix: String,

    // Identity configuration (read from unprefixed DOMAIN / ORGANIZATION_NAME)
    /// Public host or base URL embedded in identity codes
    #[serde(default)]
    pub domain: Option<String>,

    /// Shelter name used when a record does not carry one
    #[serde(default)]
    pub organization_name: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_service_name() -> String {
    "shelter-all-in-one".to_string()
}

// HTTP defaults
fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8000
}

fn default_http_ignored_paths() -> String {
    "/media/".to_string()
}

// PostgreSQL defaults
fn default_postgres_host() -> String {
    "localhost".to_string()
}

fn default_postgres_port() -> u16 {
    5432
}

fn default_postgres_database() -> String {
    "shelter_registry".to_string()
}

fn default_postgres_username() -> String {
    "postgres".to_string()
}

fn default_postgres_password() -> String {
    "postgres".to_string()
}

fn default_postgres_max_pool_size() -> usize {
    10
}

// Media defaults
fn default_media_root() -> String {
    "media".to_string()
}

fn default_media_url_prefix() -> String {
    "/media/".to_string()
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("SHELTER"))
            .set_override_option("domain", std::env::var("DOMAIN").ok())?
            .set_override_option(
                "organization_name",
                std::env::var("ORGANIZATION_NAME").ok(),
            )?
            .build()?
            .try_deserialize()
    }

    /// Comma-separated ignored paths as a list
    pub fn ignored_paths(&self) -> Vec<String> {
        self.http_ignored_paths
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests touch process-wide environment variables
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        // SAFETY: Test runs with mutex lock to prevent concurrent env access
        unsafe {
            std::env::remove_var("SHELTER_LOG_LEVEL");
            std::env::remove_var("SHELTER_HTTP_PORT");
            std::env::remove_var("SHELTER_MEDIA_ROOT");
            std::env::remove_var("DOMAIN");
            std::env::remove_var("ORGANIZATION_NAME");
        }
    }

    #[test]
    fn test_default_config() {
        let _lock = TEST_LOCK.lock().unwrap();
        clear_env();

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.http_port, 8000);
        assert_eq!(config.media_url_prefix, "/media/");
        assert_eq!(config.domain, None);
        assert_eq!(config.organization_name, None);
        assert_eq!(config.ignored_paths(), vec!["/media/".to_string()]);
    }

    #[test]
    fn test_custom_config() {
        let _lock = TEST_LOCK.lock().unwrap();
        clear_env();

        // SAFETY: Test runs with mutex lock to prevent concurrent env access
        unsafe {
            std::env::set_var("SHELTER_LOG_LEVEL", "debug");
            std::env::set_var("SHELTER_HTTP_PORT", "9090");
            std::env::set_var("SHELTER_MEDIA_ROOT", "/var/lib/shelter/media");
            std::env::set_var("DOMAIN", "shelter.example.org");
            std::env::set_var("ORGANIZATION_NAME", "North Shelter");
        }

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.http_port, 9090);
        assert_eq!(config.media_root, "/var/lib/shelter/media");
        assert_eq!(config.domain.as_deref(), Some("shelter.example.org"));
        assert_eq!(config.organization_name.as_deref(), Some("North Shelter"));

        clear_env();
    }
}
