//! # Community Settings Server Library
//!
//! Client-side plumbing for talking to a community (directory) service.
//! This library provides the connection target types shared with the settings
//! widget, the HTTP client that validates a connection and lists the login
//! methods a community service accepts, and the task pool the widget shell
//! uses to run those requests without blocking.
//!
//! ## Modules
//!
//! - [`common`] - Error types shared by the client
//! - [`community`] - Connection targets, validation results and the community client
//! - [`taskpool`] - Bounded pool for running remote requests in the background

pub mod common;
pub mod community;
pub mod taskpool;
