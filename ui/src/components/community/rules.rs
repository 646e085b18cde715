use super::document::ConfigDocument;
use crate::components::validation_patterns::{
    CommonValidationError, NumericRangeValidator, RequiredTextValidator,
};
use crate::config::ValidationRulesConfig;
use crate::validation::Validator;

type DocumentRule = Box<dyn Validator<ConfigDocument, Error = CommonValidationError> + Send + Sync>;

/// The host must not be blank.
pub struct HostRequiredRule {
    validator: RequiredTextValidator,
}

impl Default for HostRequiredRule {
    fn default() -> Self {
        Self {
            validator: RequiredTextValidator::new("Host"),
        }
    }
}

impl Validator<ConfigDocument> for HostRequiredRule {
    type Error = CommonValidationError;

    fn validate(&self, input: &ConfigDocument) -> Result<(), Self::Error> {
        self.validator.validate(&input.community.host)
    }
}

/// The port must lie within configured bounds.
pub struct PortRangeRule {
    validator: NumericRangeValidator,
}

impl PortRangeRule {
    pub fn new(min: u16, max: u16) -> Self {
        Self {
            validator: NumericRangeValidator::new("Port").with_range(min.into(), max.into()),
        }
    }
}

impl Validator<ConfigDocument> for PortRangeRule {
    type Error = CommonValidationError;

    fn validate(&self, input: &ConfigDocument) -> Result<(), Self::Error> {
        self.validator.validate(&input.community.port.to_string())
    }
}

/// Ordered client-side checks run by `validate_inputs`.
pub struct InputRules {
    rules: Vec<DocumentRule>,
}

impl InputRules {
    /// Builds the rule set from configuration. The host check is always present.
    pub fn from_config(config: &ValidationRulesConfig) -> Self {
        let mut rules: Vec<DocumentRule> = vec![Box::new(HostRequiredRule::default())];

        if let Some((min, max)) = config.port_bounds() {
            rules.push(Box::new(PortRangeRule::new(min, max)));
        }

        Self { rules }
    }

    pub fn with_rule<R>(mut self, rule: R) -> Self
    where
        R: Validator<ConfigDocument, Error = CommonValidationError> + Send + Sync + 'static,
    {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for InputRules {
    fn default() -> Self {
        Self::from_config(&ValidationRulesConfig::default())
    }
}

impl Validator<ConfigDocument> for InputRules {
    type Error = CommonValidationError;

    /// Stops at the first failing rule.
    fn validate(&self, input: &ConfigDocument) -> Result<(), Self::Error> {
        self.rules.iter().try_for_each(|rule| rule.validate(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::community::document::CommunityConfig;
    use server::community::Protocol;

    fn document(host: &str, port: u16) -> ConfigDocument {
        ConfigDocument::new(CommunityConfig::new(host, port, Protocol::Http), None)
    }

    #[test]
    fn test_default_rules_only_check_host() {
        let rules = InputRules::default();

        assert_eq!(rules.len(), 1);
        assert!(rules.validate(&document("example.com", 0)).is_ok());
        assert_eq!(
            rules.validate(&document("", 9003)).unwrap_err(),
            CommonValidationError::empty("Host")
        );
    }

    #[test]
    fn test_required_port_rejects_zero() {
        let config = ValidationRulesConfig {
            require_port: true,
            ..Default::default()
        };
        let rules = InputRules::from_config(&config);

        assert!(rules.validate(&document("example.com", 9003)).is_ok());
        assert_eq!(
            rules.validate(&document("example.com", 0)).unwrap_err().user_message(),
            "Port must be between 1 and 65535"
        );
    }

    #[test]
    fn test_host_is_checked_before_port() {
        let config = ValidationRulesConfig {
            require_port: true,
            ..Default::default()
        };
        let rules = InputRules::from_config(&config);

        assert_eq!(
            rules.validate(&document("", 0)).unwrap_err(),
            CommonValidationError::empty("Host")
        );
    }

    #[test]
    fn test_custom_rule_is_appended() {
        let rules = InputRules::default().with_rule(PortRangeRule::new(1024, 49151));

        assert!(rules.validate(&document("example.com", 9003)).is_ok());
        assert!(rules.validate(&document("example.com", 80)).is_err());
    }
}
