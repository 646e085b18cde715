//! # Community Settings
//!
//! Connection settings widget for a community directory service. The widget
//! edits a JSON configuration document, tests the connection against the
//! community service and only offers login methods once the displayed
//! connection has been confirmed.
//!
//! ## Modules
//!
//! - [`app`] - Session shell hosting the widget and running remote calls
//! - [`components`] - The widget, its state machines and the message types
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Error types and centralized error reporting
//! - [`logger`] - Logging configuration
//! - [`validation`] - Validator trait shared by field and document checks
//!
//! This library interface enables integration testing by providing access to internal modules.

pub mod app;

pub mod components;
pub mod config;
pub mod error;
pub mod logger;
pub mod validation;

// Re-export commonly used types for easier access in tests
pub use error::AppError;

pub use components::common::Msg;

pub use validation::Validator;
