//! Application configuration schemas.
//!
//! All configuration structs are deserialized from an optional TOML file
//! plus `KYARAFIT__`-prefixed environment variables via the `config`
//! crate. Each sub-module represents a logical configuration section.

pub mod api;
pub mod logging;
pub mod session;
pub mod store;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use self::api::ApiConfig;
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;
pub use self::store::{FetchFallback, StoreConfig};

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Backend REST API settings.
    #[serde(default)]
    #[validate(nested)]
    pub api: ApiConfig,
    /// Session (bearer token) settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Resource store and filter settings.
    #[serde(default)]
    #[validate(nested)]
    pub store: StoreConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// The file is optional. Environment variables prefixed with
    /// `KYARAFIT__` override file values, e.g. `KYARAFIT__API__BASE_URL`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("KYARAFIT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        app_config
            .validate()
            .map_err(|e| AppError::configuration(format!("Invalid config: {e}")))?;

        tracing::debug!(
            path,
            base_url = %app_config.api.base_url,
            page_size = app_config.store.page_size,
            "Configuration loaded"
        );
        Ok(app_config)
    }
}
