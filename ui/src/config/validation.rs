use super::app::AppConfig;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid community.base_url: {configured}")]
    BaseUrl { configured: String },
    #[error("Invalid community.config_item: must not be empty")]
    ConfigItem,
    #[error("Invalid community.request_timeout_secs: {configured} (min: 1, max: {limit})")]
    RequestTimeout { configured: u64, limit: u64 },
    #[error("Invalid community.max_concurrent_requests: {configured} (min: 1, max: {limit})")]
    ConcurrentRequests { configured: usize, limit: usize },
    #[error("Invalid validation port bounds: min {min} is greater than max {max}")]
    PortBounds { min: u16, max: u16 },
    #[error("Invalid logging.level: {configured}")]
    LogLevel { configured: String },
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::BaseUrl { configured } => {
                format!(
                    "Community service URL is not valid!\n\n\
                    Your configured value: {configured}\n\n\
                    Please set community.base_url in config.toml to an http:// or https:// address."
                )
            }
            ConfigValidationError::ConfigItem => "Configuration item name is empty!\n\n\
                Please set community.config_item in config.toml, for example \"login\"."
                .to_string(),
            ConfigValidationError::RequestTimeout { configured, limit } => {
                format!(
                    "Request timeout out of range!\n\n\
                    Your configured value: {configured} seconds\n\
                    Valid range: 1 - {limit} seconds\n\n\
                    Please update community.request_timeout_secs in config.toml."
                )
            }
            ConfigValidationError::ConcurrentRequests { configured, limit } => {
                format!(
                    "Concurrent request limit out of range!\n\n\
                    Your configured value: {configured}\n\
                    Valid range: 1 - {limit}\n\n\
                    Please update community.max_concurrent_requests in config.toml."
                )
            }
            ConfigValidationError::PortBounds { min, max } => {
                format!(
                    "Port bounds are inverted!\n\n\
                    Minimum: {min}\n\
                    Maximum: {max}\n\n\
                    Please update validation.min_port and validation.max_port in config.toml."
                )
            }
            ConfigValidationError::LogLevel { configured } => {
                format!(
                    "Unknown log level '{configured}'!\n\n\
                    Please set logging.level to one of: trace, debug, info, warn, error."
                )
            }
        }
    }
}

/// Outcome of loading configuration from file and environment.
#[derive(Debug, Clone)]
pub enum ConfigLoadResult {
    Success(Box<AppConfig>),
    LoadError(String),
    DeserializeError(String),
}

impl ConfigLoadResult {
    pub fn into_result(self) -> Result<AppConfig, String> {
        match self {
            ConfigLoadResult::Success(config) => Ok(*config),
            ConfigLoadResult::LoadError(msg) | ConfigLoadResult::DeserializeError(msg) => Err(msg),
        }
    }
}
