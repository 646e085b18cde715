use super::binding::coerce_port;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use server::community::{ConnectionTarget, Protocol};
use std::fmt;

/// Login methods that do not depend on the community service.
///
/// Selecting one of these always disables the method selector.
pub const EXTERNAL_METHODS: [&str; 2] = ["cas", "external"];

/// Name of an authentication method, kept exactly as the settings document
/// spells it so that loading and reading back a document is lossless.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoginMethod(String);

impl LoginMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for methods in [`EXTERNAL_METHODS`], compared case-insensitively.
    pub fn is_external(&self) -> bool {
        EXTERNAL_METHODS
            .iter()
            .any(|external| self.0.eq_ignore_ascii_case(external))
    }
}

impl fmt::Display for LoginMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LoginMethod {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for LoginMethod {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Connection section of the settings document.
///
/// The wire name of this section is `community`. Keys the widget does not
/// edit (for example `productType`) are carried in `extra` untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default, deserialize_with = "lenient_port")]
    pub port: u16,
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CommunityConfig {
    pub fn new(host: impl Into<String>, port: u16, protocol: Protocol) -> Self {
        Self {
            host: host.into(),
            port,
            protocol,
            extra: Map::new(),
        }
    }

    /// The connection target this section points at. Pass-through keys are
    /// not part of it.
    pub fn target(&self) -> ConnectionTarget {
        ConnectionTarget::new(self.host.clone(), self.port, self.protocol)
    }
}

/// Reads a port the way the form field does: numbers outside `0..=65535`,
/// fractions, unparsable strings and `null` all become 0.
fn lenient_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let port = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()).unwrap_or(0),
        Value::String(s) => coerce_port(&s),
        _ => 0,
    };
    Ok(port)
}

/// The settings document edited by the community widget.
///
/// Wire shape:
/// `{ "community": { "host": ..., "port": ..., "protocol": "HTTP"|"HTTPS" }, "method": ... }`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub community: CommunityConfig,
    #[serde(default)]
    pub method: Option<LoginMethod>,
}

impl ConfigDocument {
    pub fn new(community: CommunityConfig, method: Option<LoginMethod>) -> Self {
        Self { community, method }
    }

    pub fn target(&self) -> ConnectionTarget {
        self.community.target()
    }

    pub fn has_external_method(&self) -> bool {
        self.method.as_ref().is_some_and(LoginMethod::is_external)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_value(&self) -> Value {
        // Serializing plain strings, numbers and maps cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_external_methods_are_case_insensitive() {
        assert!(LoginMethod::from("cas").is_external());
        assert!(LoginMethod::from("CAS").is_external());
        assert!(LoginMethod::from("external").is_external());
        assert!(!LoginMethod::from("LDAP").is_external());
        assert!(!LoginMethod::from("autonomy").is_external());
    }

    #[test]
    fn test_pass_through_keys_survive_round_trip() {
        let wire = json!({
            "community": {
                "host": "example.com",
                "port": 9003,
                "protocol": "HTTPS",
                "productType": "UASERVER",
                "indexErrorMessage": "What's an index?"
            },
            "method": "LDAP"
        });

        let document: ConfigDocument = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(document.community.extra.len(), 2);
        assert_eq!(document.to_json_value(), wire);
    }

    #[test]
    fn test_null_method_is_absent() {
        let document = ConfigDocument::from_json(
            r#"{"community": {"host": "", "port": 0, "protocol": "HTTP"}, "method": null}"#,
        )
        .unwrap();

        assert_eq!(document.method, None);
        assert!(!document.has_external_method());
        assert_eq!(document.to_json_value()["method"], Value::Null);
    }

    #[test]
    fn test_target_ignores_pass_through_keys() {
        let mut first = CommunityConfig::new("example.com", 9003, Protocol::Https);
        let second = first.clone();
        first
            .extra
            .insert("productType".to_string(), json!("UASERVER"));

        assert_eq!(first.target(), second.target());
    }

    #[test]
    fn test_out_of_range_port_loads_as_zero() {
        let document = ConfigDocument::from_json(
            r#"{"community": {"host": "example.com", "port": 70000, "protocol": "HTTPS"}, "method": "LDAP"}"#,
        )
        .unwrap();

        assert_eq!(document.community.port, 0);
        assert_eq!(document.community.host, "example.com");
    }

    #[test]
    fn test_port_is_coerced_like_the_form_field() {
        let port_of = |port: Value| {
            let wire = json!({ "community": { "host": "h", "port": port, "protocol": "HTTP" } });
            serde_json::from_value::<ConfigDocument>(wire)
                .unwrap()
                .community
                .port
        };

        assert_eq!(port_of(json!(9003)), 9003);
        assert_eq!(port_of(json!(-1)), 0);
        assert_eq!(port_of(json!(90.5)), 0);
        assert_eq!(port_of(json!(" 8080 ")), 8080);
        assert_eq!(port_of(json!("abc")), 0);
        assert_eq!(port_of(Value::Null), 0);
    }
}
