use super::types::{ConnectionTarget, SecurityTypesResponse, ValidationResult};
use crate::common::errors::HttpError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Remote operations the settings widget needs from a community service.
///
/// The widget never calls this directly: its session shell does, on the task
/// pool, and feeds the results back into the widget as callbacks. Keeping it a
/// trait lets the shell be exercised against an in-memory service in tests.
///
/// # Examples
///
/// ```no_run
/// use server::community::{CommunityService, ConnectionTarget, ValidationResult};
/// use server::common::HttpError;
/// use async_trait::async_trait;
///
/// struct AlwaysValid;
///
/// #[async_trait]
/// impl CommunityService for AlwaysValid {
///     async fn validate(&self, _config_item: &str, _document: serde_json::Value)
///         -> Result<ValidationResult, HttpError> {
///         Ok(ValidationResult::valid())
///     }
///
///     async fn security_types(&self, _target: &ConnectionTarget)
///         -> Result<Vec<String>, HttpError> {
///         Ok(vec!["LDAP".to_string()])
///     }
/// }
/// ```
#[async_trait]
pub trait CommunityService: Send + Sync {
    /// Asks the service whether `document` describes a reachable, usable
    /// community server. `config_item` names the settings section the
    /// document belongs to.
    async fn validate(
        &self,
        config_item: &str,
        document: Value,
    ) -> Result<ValidationResult, HttpError>;

    /// Lists the login methods the community server at `target` accepts, in
    /// the order the service reports them.
    async fn security_types(&self, target: &ConnectionTarget) -> Result<Vec<String>, HttpError>;
}

/// Endpoint configuration for [`CommunityClient`].
#[derive(Clone, Debug)]
pub struct CommunityClientConfig {
    pub base_url: String,
    pub validate_path: String,
    pub security_types_path: String,
    pub timeout: Duration,
}

impl CommunityClientConfig {
    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn validate_url(&self) -> String {
        self.url(&self.validate_path)
    }

    pub fn security_types_url(&self) -> String {
        self.url(&self.security_types_path)
    }
}

impl Default for CommunityClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            validate_path: "/api/config/validate".to_string(),
            security_types_path: "/api/securitytypes".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP implementation of [`CommunityService`].
#[derive(Clone)]
pub struct CommunityClient {
    http_client: reqwest::Client,
    config: CommunityClientConfig,
}

impl CommunityClient {
    /// Creates a client with its own reqwest client honouring the configured timeout.
    pub fn new(config: CommunityClientConfig) -> Result<Self, HttpError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| HttpError::ClientCreation {
                reason: e.to_string(),
            })?;

        Ok(Self::with_http_client(config, http_client))
    }

    /// Creates a client around an existing reqwest client.
    pub fn with_http_client(config: CommunityClientConfig, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn config(&self) -> &CommunityClientConfig {
        &self.config
    }

    fn timeout_secs(&self) -> u64 {
        self.config.timeout.as_secs()
    }
}

#[async_trait]
impl CommunityService for CommunityClient {
    async fn validate(
        &self,
        config_item: &str,
        document: Value,
    ) -> Result<ValidationResult, HttpError> {
        let url = self.config.validate_url();
        let mut body = serde_json::Map::new();
        body.insert(config_item.to_string(), document);

        log::debug!("Validating '{config_item}' configuration against {url}");

        let response = self
            .http_client
            .post(&url)
            .json(&Value::Object(body))
            .send()
            .await
            .map_err(|e| HttpError::from_reqwest(&url, &e, self.timeout_secs()))?;

        if !response.status().is_success() {
            return Err(HttpError::status(&url, response.status()));
        }

        let result = response
            .json::<ValidationResult>()
            .await
            .map_err(|e| HttpError::from_reqwest(&url, &e, self.timeout_secs()))?;

        log::info!(
            "Validation of '{config_item}' finished: valid={}",
            result.valid
        );
        Ok(result)
    }

    async fn security_types(&self, target: &ConnectionTarget) -> Result<Vec<String>, HttpError> {
        let url = self.config.security_types_url();

        log::debug!("Fetching security types for {target} from {url}");

        let response = self
            .http_client
            .get(&url)
            .query(&target.query_pairs())
            .send()
            .await
            .map_err(|e| HttpError::from_reqwest(&url, &e, self.timeout_secs()))?;

        if !response.status().is_success() {
            return Err(HttpError::status(&url, response.status()));
        }

        let body = response
            .json::<SecurityTypesResponse>()
            .await
            .map_err(|e| HttpError::from_reqwest(&url, &e, self.timeout_secs()))?;

        log::info!(
            "Received {} security types for {target}",
            body.security_types.len()
        );
        Ok(body.security_types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_join_without_double_slashes() {
        let config = CommunityClientConfig {
            base_url: "http://settings.local/".to_string(),
            validate_path: "/api/config/validate".to_string(),
            security_types_path: "securitytypes".to_string(),
            timeout: Duration::from_secs(5),
        };

        assert_eq!(config.validate_url(), "http://settings.local/api/config/validate");
        assert_eq!(config.security_types_url(), "http://settings.local/securitytypes");
    }
}
