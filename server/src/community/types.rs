use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport protocol used to reach a community service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// Plain HTTP (the default for a fresh form)
    #[default]
    #[serde(rename = "HTTP")]
    Http,
    /// HTTP over TLS
    #[serde(rename = "HTTPS")]
    Https,
}

impl Protocol {
    /// Wire name of the protocol, as sent to the service and shown in the form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "HTTP",
            Protocol::Https => "HTTPS",
        }
    }

    /// Coerces free-form surface input into a protocol.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace. Anything
    /// that is not `https` falls back to [`Protocol::Http`]; this never fails.
    pub fn from_input(input: &str) -> Self {
        if input.trim().eq_ignore_ascii_case("https") {
            Protocol::Https
        } else {
            Protocol::Http
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The (host, port, protocol) triple identifying a community service.
///
/// Two targets are equal only when all three parts match exactly. The settings
/// widget uses this equality to decide whether a validation result or a
/// method list still describes what the user is looking at.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
    pub protocol: Protocol,
}

impl ConnectionTarget {
    pub fn new(host: impl Into<String>, port: u16, protocol: Protocol) -> Self {
        Self {
            host: host.into(),
            port,
            protocol,
        }
    }

    /// Query parameters used when asking the service for its login methods.
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("host", self.host.clone()),
            ("port", self.port.to_string()),
            ("protocol", self.protocol.as_str().to_string()),
        ]
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}:{}",
            self.protocol.as_str().to_ascii_lowercase(),
            self.host,
            self.port
        )
    }
}

/// Outcome of a remote validation round trip.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// Optional service-provided reason, usually present when `valid` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            valid: true,
            data: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            data: Some(reason.into()),
        }
    }
}

/// Body returned by the security types endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityTypesResponse {
    #[serde(default)]
    pub security_types: Vec<String>,
}
