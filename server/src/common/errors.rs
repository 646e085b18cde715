use thiserror::Error;

/// HTTP-related errors raised while talking to the community service.
///
/// Every variant carries enough context to be logged on its own. None of them
/// are fatal to the settings widget: the session shell turns a failed
/// validation round trip into an invalid result and a failed method list
/// fetch into a logged warning.
///
/// # Error Categories
///
/// ## Client Configuration Errors
/// - [`ClientCreation`] - HTTP client initialization failures
///
/// ## Request Execution Errors
/// - [`RequestFailed`] - Transport failures and non-success status codes
/// - [`Timeout`] - Request exceeded the configured timeout
/// - [`InvalidResponse`] - Body could not be decoded into the expected shape
///
/// # Examples
///
/// ```no_run
/// use server::common::errors::HttpError;
///
/// fn log_http_error(error: &HttpError) {
///     match error {
///         HttpError::Timeout { url, seconds } => {
///             log::warn!("HTTP request timeout: url={}, duration={}s", url, seconds);
///         }
///         HttpError::RequestFailed { url, reason } => {
///             log::error!("HTTP request failed: url={}, reason={}", url, reason);
///         }
///         _ => log::error!("HTTP error: {}", error),
///     }
/// }
/// ```
///
/// [`ClientCreation`]: HttpError::ClientCreation
/// [`RequestFailed`]: HttpError::RequestFailed
/// [`Timeout`]: HttpError::Timeout
/// [`InvalidResponse`]: HttpError::InvalidResponse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// HTTP client initialization failed.
    ///
    /// Usually a TLS backend or invalid base URL problem.
    #[error("HTTP client creation failed: {reason}")]
    ClientCreation { reason: String },

    /// The request could not be sent or the service answered with a
    /// non-success status.
    #[error("Request failed: {url} - {reason}")]
    RequestFailed { url: String, reason: String },

    /// The request took longer than the configured timeout.
    #[error("Request timeout after {seconds}s: {url}")]
    Timeout { url: String, seconds: u64 },

    /// The response body did not match the expected shape.
    #[error("Invalid response: expected {expected}, got {actual}")]
    InvalidResponse { expected: String, actual: String },
}

impl HttpError {
    /// Builds the error for a response whose status is not 2xx.
    pub fn status(url: impl Into<String>, status: reqwest::StatusCode) -> Self {
        HttpError::RequestFailed {
            url: url.into(),
            reason: format!("HTTP {status}"),
        }
    }

    /// Classifies a reqwest error, keeping timeouts distinct from other failures.
    pub fn from_reqwest(url: impl Into<String>, error: &reqwest::Error, timeout_secs: u64) -> Self {
        let url = url.into();
        if error.is_timeout() {
            HttpError::Timeout {
                url,
                seconds: timeout_secs,
            }
        } else if error.is_decode() {
            HttpError::InvalidResponse {
                expected: "JSON body".to_string(),
                actual: error.to_string(),
            }
        } else {
            HttpError::RequestFailed {
                url,
                reason: error.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_mentions_code() {
        let error = HttpError::status("http://example.com/validate", reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(
            error.to_string(),
            "Request failed: http://example.com/validate - HTTP 502 Bad Gateway"
        );
    }

    #[test]
    fn test_timeout_display() {
        let error = HttpError::Timeout {
            url: "http://example.com".to_string(),
            seconds: 5,
        };
        assert_eq!(error.to_string(), "Request timeout after 5s: http://example.com");
    }
}
