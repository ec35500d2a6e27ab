//! Configuration manager implementation

use std::path::PathBuf;

use config::{Config, Environment, File};
use tracing::debug;

use crate::{
    error::{ConfigError, Result},
    types::AlertsConfig,
};

const DEFAULT_ENV_PREFIX: &str = "ALERTDECK";

/// Loads [`AlertsConfig`] from a TOML file and the environment
pub struct ConfigManager {
    /// Configuration file path
    config_path: PathBuf,
    /// Environment prefix
    env_prefix: String,
}

impl ConfigManager {
    /// Create a new configuration manager
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Create with custom config path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Use a different environment prefix (`<PREFIX>__BASE_URL`, ...)
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Get default config path
    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("alertdeck")
            .join("config.toml")
    }

    /// Load and validate the configuration. A missing file is not an error;
    /// defaults and the environment still apply.
    pub fn load(&self) -> Result<AlertsConfig> {
        debug!("Loading configuration from {}", self.config_path.display());

        let builder = Config::builder()
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(Environment::with_prefix(&self.env_prefix).separator("__"));

        let config: AlertsConfig = builder.build()?.try_deserialize()?;
        self.validate(&config)?;
        Ok(config)
    }

    pub fn validate(&self, config: &AlertsConfig) -> Result<()> {
        let url = url::Url::parse(config.api_root()).map_err(|e| {
            ConfigError::Validation(format!("base_url {:?} is not a URL: {e}", config.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "base_url must use http or https, got {}",
                url.scheme()
            )));
        }
        if config.tenant_header.trim().is_empty() {
            return Err(ConfigError::Validation(
                "tenant_header must not be empty".to_string(),
            ));
        }
        if config.http.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "http.timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
