//! API configuration

use core_kernel::CoreError;
use serde::Deserialize;

/// Where processed claims are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    /// Process-local, lost on restart
    Memory,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Storage backend
    pub storage: StorageBackend,
    /// Log level
    pub log_level: String,
    /// Log format
    pub log_format: LogFormat,
    /// Requests allowed per client per minute on rate limited routes
    pub rate_limit_per_minute: u32,
    /// Key rate limits on `X-Forwarded-For`; only safe behind a proxy that sets it
    pub trust_forwarded_for: bool,
    /// Maximum accepted request body in bytes
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/claims".to_string(),
            storage: StorageBackend::Postgres,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            rate_limit_per_minute: 10,
            trust_forwarded_for: false,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables.
    ///
    /// `DATABASE_URL` takes precedence over `API_DATABASE_URL`.
    pub fn from_env() -> Result<Self, CoreError> {
        let config: ApiConfig = config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .set_override_option("database_url", std::env::var("DATABASE_URL").ok())
            .and_then(|builder| builder.build())
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| CoreError::configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks values the type system cannot express
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.rate_limit_per_minute == 0 {
            return Err(CoreError::configuration(
                "rate_limit_per_minute must be at least 1",
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(CoreError::configuration("max_body_bytes must be at least 1"));
        }
        if self.storage == StorageBackend::Postgres && self.database_url.trim().is_empty() {
            return Err(CoreError::configuration(
                "database_url is required for postgres storage",
            ));
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
