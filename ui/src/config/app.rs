use super::{LoggingConfig, limits::*, validation::ConfigValidationError};
use serde::Deserialize;
use server::community::CommunityClientConfig;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    community: CommunityServiceConfig,
    #[serde(default)]
    validation: ValidationRulesConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl AppConfig {
    /// Validate the configuration, collecting every problem found
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        let base_url = self.community.base_url();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            errors.push(ConfigValidationError::BaseUrl {
                configured: base_url.to_string(),
            });
        }

        if self.community.config_item().trim().is_empty() {
            errors.push(ConfigValidationError::ConfigItem);
        }

        let timeout = self.community.request_timeout_secs();
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&timeout) {
            errors.push(ConfigValidationError::RequestTimeout {
                configured: timeout,
                limit: MAX_REQUEST_TIMEOUT_SECS,
            });
        }

        let concurrency = self.community.max_concurrent_requests();
        if !(1..=MAX_CONCURRENT_REQUESTS).contains(&concurrency) {
            errors.push(ConfigValidationError::ConcurrentRequests {
                configured: concurrency,
                limit: MAX_CONCURRENT_REQUESTS,
            });
        }

        if let Some((min, max)) = self.validation.port_bounds() {
            if min > max {
                errors.push(ConfigValidationError::PortBounds { min, max });
            }
        }

        let level = self.logging.level().to_lowercase();
        if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
            errors.push(ConfigValidationError::LogLevel {
                configured: self.logging.level().to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    // Configuration section accessors
    pub fn community(&self) -> &CommunityServiceConfig {
        &self.community
    }

    pub fn validation(&self) -> &ValidationRulesConfig {
        &self.validation
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }
}

/// `[community]` section: where the community service lives
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommunityServiceConfig {
    base_url: Option<String>,
    validate_path: Option<String>,
    security_types_path: Option<String>,
    config_item: Option<String>,
    request_timeout_secs: Option<u64>,
    max_concurrent_requests: Option<usize>,
}

impl CommunityServiceConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or("http://localhost:8080")
    }

    pub fn validate_path(&self) -> &str {
        self.validate_path
            .as_deref()
            .unwrap_or("/api/config/validate")
    }

    pub fn security_types_path(&self) -> &str {
        self.security_types_path
            .as_deref()
            .unwrap_or("/api/securitytypes")
    }

    /// Name of the configuration item the document is validated under.
    pub fn config_item(&self) -> &str {
        self.config_item.as_deref().unwrap_or("login")
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs.unwrap_or(30)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs())
    }

    pub fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
            .unwrap_or(DEFAULT_CONCURRENT_REQUESTS)
    }

    pub fn client_config(&self) -> CommunityClientConfig {
        CommunityClientConfig {
            base_url: self.base_url().to_string(),
            validate_path: self.validate_path().to_string(),
            security_types_path: self.security_types_path().to_string(),
            timeout: self.request_timeout(),
        }
    }
}

/// `[validation]` section: client-side checks run before contacting the service.
///
/// The host check is always on. A port check is added when `require_port` is
/// set or when either bound is configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationRulesConfig {
    pub require_port: bool,
    pub min_port: Option<u16>,
    pub max_port: Option<u16>,
}

impl ValidationRulesConfig {
    pub fn port_bounds(&self) -> Option<(u16, u16)> {
        if !self.require_port && self.min_port.is_none() && self.max_port.is_none() {
            return None;
        }

        let default_min = if self.require_port { MIN_REQUIRED_PORT } else { 0 };
        Some((
            self.min_port.unwrap_or(default_min),
            self.max_port.unwrap_or(MAX_PORT),
        ))
    }
}
