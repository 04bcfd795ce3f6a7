//! Strategic Relay - strategic updates to GitHub issues
//!
//! A single webhook accepts JSON "strategic update" payloads, formats each
//! into one or more Markdown issues and files them with the GitHub issues API.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Payload models, the tracker port and errors
//! - **Service Layer** (`services`): Issue formatting and dispatch
//! - **Infrastructure Layer** (`infrastructure`): GitHub client, config, logging
//! - **Adapters** (`adapters`): The axum webhook
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use strategic_relay::{Config, GitHubIssueClient, UpdateService, WebhookServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let tracker = Arc::new(GitHubIssueClient::new(config.tracker.clone())?);
//!     let service = Arc::new(UpdateService::new(tracker));
//!     WebhookServer::new(config.server, service)
//!         .serve_with_shutdown(async {
//!             let _ = tokio::signal::ctrl_c().await;
//!         })
//!         .await
//!         .map_err(|e| anyhow::anyhow!(e))
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::http::WebhookServer;
pub use domain::errors::{RelayError, RelayResult, TrackerError};
pub use domain::models::{
    ActionKind, Config, CreatedIssue, IssuePayload, LoggingConfig, ServerConfig, TrackerConfig,
    UpdateAction,
};
pub use domain::ports::IssueTracker;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::github::GitHubIssueClient;
pub use services::UpdateService;
