pub mod common;
pub mod community;
pub mod validation_patterns;
