//! alertdeck configuration
//!
//! Loads the alerting backend settings from an optional TOML file overlaid
//! by `ALERTDECK__*` environment variables, and validates them.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::ConfigManager;
pub use types::AlertsConfig;
