//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use haven_core::HavenError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

const DEFAULT_JWT_SECRET: &str = "change-me-in-production-please-32b";

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Loads configuration from `config_dir`.
    ///
    /// Sources, later ones overriding earlier ones:
    /// 1. `default.toml`
    /// 2. `{environment}.toml` (from `HAVEN_ENVIRONMENT`, default `development`)
    /// 3. `local.toml`
    /// 4. Environment variables with the `HAVEN_` prefix and `__` separator
    pub fn new(config_dir: impl Into<String>) -> Result<Self, HavenError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    pub fn from_default_location() -> Result<Self, HavenError> {
        Self::new("./config")
    }

    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk. The previous value is kept on error.
    pub async fn reload(&self) -> Result<(), HavenError> {
        let new_config = Self::load_config(&self.config_dir)?;
        *self.config.write().await = new_config;
        info!("Configuration reloaded");
        Ok(())
    }

    fn load_config(config_dir: &str) -> Result<AppConfig, HavenError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        let environment =
            std::env::var("HAVEN_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        info!(environment = %environment, config_dir, "Loading configuration");

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{config_dir}/{name}.toml");
            if Path::new(&path).exists() {
                debug!("Loading config file: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("HAVEN")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.cors_origins"),
        );

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error_to_haven_error)?;

        Self::validate_config(&app_config)?;

        Ok(app_config)
    }

    fn validate_config(config: &AppConfig) -> Result<(), HavenError> {
        if config.app.is_production() && config.security.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("Using the default JWT secret in production");
        }

        ConfigValidator::validate(config).map_err(|errors| {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            HavenError::Configuration(message)
        })
    }

    /// Gets a configuration value by dotted key path, e.g. `redis.op_timeout_ms`.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

fn config_error_to_haven_error(err: ConfigError) -> HavenError {
    HavenError::Configuration(err.to_string())
}
