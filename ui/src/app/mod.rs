//! # Application Module
//!
//! The session shell around the community widget.
//!
//! - [`session`] - Owns the widget and routes its requests to the community service
//! - [`task_manager`] - Background task coordination with loading messages and timeouts
//!
//! ## Usage
//!
//! ```no_run
//! use community_settings::app::session::SettingsSession;
//! use community_settings::components::community::ConfigDocument;
//! use community_settings::config::AppConfig;
//! use server::community::{CommunityClient, CommunityClientConfig};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::default();
//!     let client = CommunityClient::new(CommunityClientConfig::default())?;
//!     let mut session = SettingsSession::new(Arc::new(client), &config);
//!
//!     session.load(ConfigDocument::from_json(r#"{"community":{"host":"example.com","port":9003,"protocol":"HTTPS"},"method":"LDAP"}"#)?);
//!     session.test_connection();
//!     session.run_until_idle(Duration::from_secs(60))?;
//!     Ok(())
//! }
//! ```

/// Widget host and message loop
pub mod session;
/// Background task management and coordination
pub mod task_manager;
