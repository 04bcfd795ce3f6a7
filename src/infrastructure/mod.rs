//! Infrastructure layer module
//!
//! Adapters for the outside world:
//! - Configuration management
//! - GitHub issues client
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod github;
pub mod logging;
