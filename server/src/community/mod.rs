//! Community service connection types and client.

pub mod client;
pub mod types;

pub use client::{CommunityClient, CommunityClientConfig, CommunityService};
pub use types::{ConnectionTarget, Protocol, SecurityTypesResponse, ValidationResult};
