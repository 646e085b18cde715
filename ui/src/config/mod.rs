use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

pub mod app;
pub mod limits;
pub mod validation;

pub use app::{AppConfig, CommunityServiceConfig, ValidationRulesConfig};
pub use validation::{ConfigLoadResult, ConfigValidationError};

/// Configuration file used when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Load configuration from a TOML file plus environment overrides.
///
/// Environment entries use `__` as the section separator
/// (`COMMUNITY__BASE_URL`, `LOGGING__LEVEL`) and win over file values. A
/// `.env` file in the working directory is read first. An explicitly given
/// file must exist; the default `config.toml` may be absent.
pub fn load_config(path: Option<&Path>) -> ConfigLoadResult {
    dotenv::dotenv().ok();
    let env_source = Environment::default().separator("__");

    let file_source = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let config = match Config::builder()
        .add_source(file_source)
        .add_source(env_source)
        .build()
    {
        Ok(config) => config,
        Err(e) => {
            return ConfigLoadResult::LoadError(format!(
                "Configuration loading failed: {e}. Please check your config file and environment variables."
            ));
        }
    };

    match config.try_deserialize::<AppConfig>() {
        Ok(app_config) => {
            if let Err(validation_errors) = app_config.validate() {
                let error_messages: Vec<String> =
                    validation_errors.iter().map(|e| e.user_message()).collect();
                return ConfigLoadResult::DeserializeError(format!(
                    "Configuration validation failed:\n{}",
                    error_messages.join("\n\n")
                ));
            }
            ConfigLoadResult::Success(Box::new(app_config))
        }
        Err(e) => ConfigLoadResult::DeserializeError(format!("Failed to deserialize config: {e}")),
    }
}

/// `[logging]` section
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn new(level: Option<&str>, file: Option<&str>) -> Self {
        Self {
            level: level.map(str::to_string),
            file: file.map(str::to_string),
        }
    }

    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}
