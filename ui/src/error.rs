use crate::components::common::{Msg, PopupActivityMsg};
use std::fmt::Display;
use std::sync::mpsc::Sender;

/// Application-wide error types for the community settings shell.
///
/// None of these are fatal to the widget. Remote failures end up as an
/// invalid validation result or a missing method list; everything else is
/// reported and the session carries on.
///
/// # Error Categories
///
/// - [`Remote`] - Community service request failures
/// - [`Config`] - Configuration loading and validation errors
/// - [`State`] - Session state inconsistencies
/// - [`Channel`] - Message delivery between the session and its tasks
/// - [`Io`] - Reading documents or writing output
///
/// # Examples
///
/// ```no_run
/// use community_settings::error::{AppError, ErrorReporter};
///
/// fn handle(error: AppError, reporter: &ErrorReporter) {
///     match error {
///         AppError::Remote(_) => reporter.report_simple(error, "CommunityService", "validate"),
///         other => reporter.report_simple(other, "Session", "run"),
///     }
/// }
/// ```
///
/// [`Remote`]: AppError::Remote
/// [`Config`]: AppError::Config
/// [`State`]: AppError::State
/// [`Channel`]: AppError::Channel
/// [`Io`]: AppError::Io
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Community service request failures.
    ///
    /// Timeouts, transport failures and unexpected responses. Validation
    /// failures reported by the service are not errors; they are results.
    Remote(String),

    /// Configuration loading and validation errors.
    Config(String),

    /// Session state inconsistencies.
    State(String),

    /// Message channel failures between the session and background tasks.
    Channel(String),

    /// File system errors while reading documents or writing output.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Remote(msg) => write!(f, "Community Service Error: {msg}"),
            AppError::Config(msg) => write!(f, "Configuration Error: {msg}"),
            AppError::State(msg) => write!(f, "State Error: {msg}"),
            AppError::Channel(msg) => write!(f, "Channel Error: {msg}"),
            AppError::Io(msg) => write!(f, "IO Error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<server::common::HttpError> for AppError {
    fn from(err: server::common::HttpError) -> Self {
        AppError::Remote(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(format!("Invalid settings document: {err}"))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Error severity levels for appropriate UI response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Show a warning and log
    Warning,
    /// Show an error and log
    Error,
}

/// Context information for errors
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub component: String,
    pub operation: String,
    pub user_message: String,
    pub technical_details: Option<String>,
    pub suggestion: Option<String>,
    pub severity: ErrorSeverity,
}

impl ErrorContext {
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            user_message: format!("An error occurred in {component}. Please try again."),
            technical_details: None,
            suggestion: None,
            severity: ErrorSeverity::Error,
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.user_message = message.to_string();
        self
    }

    pub fn with_technical_details(mut self, details: &str) -> Self {
        self.technical_details = Some(details.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }

    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Central error reporting: logs with context and forwards to the session.
#[derive(Clone)]
pub struct ErrorReporter {
    tx: Sender<Msg>,
}

impl ErrorReporter {
    pub fn new(tx: Sender<Msg>) -> Self {
        Self { tx }
    }

    /// Report a simple error with basic context
    pub fn report_simple(&self, error: AppError, component: &str, operation: &str) {
        let context =
            ErrorContext::new(component, operation).with_technical_details(&error.to_string());
        self.report(error, context);
    }

    pub fn report(&self, error: AppError, context: ErrorContext) {
        let details = Self::format_additional_context(&context);

        match context.severity {
            ErrorSeverity::Warning => {
                log::warn!(
                    "[{}:{}] {} ({error}){details}",
                    context.component,
                    context.operation,
                    context.user_message,
                );
                let popup = Msg::PopupActivity(PopupActivityMsg::ShowWarning(
                    Self::format_user_message(&context),
                ));
                if let Err(e) = self.tx.send(popup) {
                    log::error!("Failed to send warning message: {e}");
                }
            }
            ErrorSeverity::Error => {
                log::error!(
                    "[{}:{}] {} ({error}){details}",
                    context.component,
                    context.operation,
                    context.user_message,
                );
                let popup = Msg::PopupActivity(PopupActivityMsg::ShowError(error));
                if let Err(e) = self.tx.send(popup) {
                    log::error!("Failed to send error message: {e}");
                }
            }
        }
    }

    fn format_additional_context(context: &ErrorContext) -> String {
        let mut parts = Vec::new();

        if let Some(ref technical_details) = context.technical_details {
            parts.push(format!("Technical: {technical_details}"));
        }

        if let Some(ref suggestion) = context.suggestion {
            parts.push(format!("Suggestion: {suggestion}"));
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!("\n{}", parts.join("\n"))
        }
    }

    fn format_user_message(context: &ErrorContext) -> String {
        match &context.suggestion {
            Some(suggestion) => format!("{}\n\n{suggestion}", context.user_message),
            None => context.user_message.clone(),
        }
    }

    // ========== Helper Methods for Common Error Patterns ==========

    pub fn report_send_error(&self, context: &str, error: impl Display) {
        let app_error = AppError::Channel(format!("Failed to send {context}: {error}"));
        log::error!("{app_error}");
    }
}
