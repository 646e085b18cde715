use crate::validation::Validator;

/// Field-level validation errors with user-facing messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonValidationError {
    Empty {
        field_name: String,
    },
    InvalidFormat {
        field_name: String,
        expected_format: String,
    },
    OutOfRange {
        field_name: String,
        min: Option<String>,
        max: Option<String>,
    },
}

impl CommonValidationError {
    pub fn empty(field_name: impl Into<String>) -> Self {
        Self::Empty {
            field_name: field_name.into(),
        }
    }

    pub fn invalid_format(
        field_name: impl Into<String>,
        expected_format: impl Into<String>,
    ) -> Self {
        Self::InvalidFormat {
            field_name: field_name.into(),
            expected_format: expected_format.into(),
        }
    }

    pub fn out_of_range(
        field_name: impl Into<String>,
        min: Option<impl Into<String>>,
        max: Option<impl Into<String>>,
    ) -> Self {
        Self::OutOfRange {
            field_name: field_name.into(),
            min: min.map(|m| m.into()),
            max: max.map(|m| m.into()),
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Empty { field_name } => format!("{field_name} cannot be empty"),
            Self::InvalidFormat {
                field_name,
                expected_format,
            } => {
                format!("{field_name} must be a {expected_format}")
            }
            Self::OutOfRange {
                field_name,
                min,
                max,
            } => match (min, max) {
                (Some(min), Some(max)) => {
                    format!("{field_name} must be between {min} and {max}")
                }
                (Some(min), None) => format!("{field_name} must be at least {min}"),
                (None, Some(max)) => format!("{field_name} must be at most {max}"),
                (None, None) => format!("{field_name} is out of range"),
            },
        }
    }
}

impl std::fmt::Display for CommonValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for CommonValidationError {}

/// Rejects input that is empty once surrounding whitespace is removed
pub struct RequiredTextValidator {
    field_name: String,
}

impl RequiredTextValidator {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
        }
    }
}

impl Validator<str> for RequiredTextValidator {
    type Error = CommonValidationError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        if input.trim().is_empty() {
            Err(CommonValidationError::empty(&self.field_name))
        } else {
            Ok(())
        }
    }
}

/// Numeric range validator for input fields
pub struct NumericRangeValidator {
    min: Option<i64>,
    max: Option<i64>,
    field_name: String,
}

impl NumericRangeValidator {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            min: None,
            max: None,
            field_name: field_name.into(),
        }
    }

    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

}

impl Validator<str> for NumericRangeValidator {
    type Error = CommonValidationError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        if input.trim().is_empty() {
            return Err(CommonValidationError::empty(&self.field_name));
        }

        let number: i64 = input
            .trim()
            .parse()
            .map_err(|_| CommonValidationError::invalid_format(&self.field_name, "whole number"))?;

        let out_of_range = self.min.is_some_and(|min| number < min)
            || self.max.is_some_and(|max| number > max);

        if out_of_range {
            return Err(CommonValidationError::out_of_range(
                &self.field_name,
                self.min.map(|m| m.to_string()),
                self.max.map(|m| m.to_string()),
            ));
        }

        Ok(())
    }
}

/// Validation state for UI feedback
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationState {
    pub is_valid: bool,
    pub error_message: Option<String>,
}

impl ValidationState {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error_message: Some(message.into()),
        }
    }

    pub fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::valid(),
            Err(e) => Self::invalid(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_range_validator() {
        let validator = NumericRangeValidator::new("Port").with_range(1, 65535);

        assert!(validator.validate("9003").is_ok());
        assert!(validator.validate("1").is_ok());
        assert!(validator.validate("65535").is_ok());

        assert!(validator.validate("0").is_err());
        assert!(validator.validate("65536").is_err());
        assert!(validator.validate("abc").is_err());
        assert!(validator.validate("").is_err());
    }

    #[test]
    fn test_required_text_validator() {
        let validator = RequiredTextValidator::new("Host");

        assert!(validator.validate("example.com").is_ok());
        assert_eq!(
            validator.validate("   ").unwrap_err(),
            CommonValidationError::empty("Host")
        );
        assert_eq!(
            validator.validate("").unwrap_err().user_message(),
            "Host cannot be empty"
        );
    }

    #[test]
    fn test_validation_state() {
        let valid_state = ValidationState::valid();
        assert!(valid_state.is_valid);
        assert!(valid_state.error_message.is_none());

        let invalid_state = ValidationState::invalid("Error message");
        assert!(!invalid_state.is_valid);
        assert_eq!(
            invalid_state.error_message,
            Some("Error message".to_string())
        );

        let from_result_err =
            ValidationState::from_result(Err::<(), String>("Test error".to_string()));
        assert!(!from_result_err.is_valid);
        assert_eq!(
            from_result_err.error_message,
            Some("Test error".to_string())
        );
    }
}
