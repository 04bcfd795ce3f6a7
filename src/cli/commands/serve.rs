//! Implementation of the `strategic-relay serve` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use crate::adapters::http::WebhookServer;
use crate::domain::models::Config;
use crate::domain::ports::IssueTracker;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::github::GitHubIssueClient;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::services::UpdateService;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Configuration file (defaults to .strategic-relay/config.yaml and local.yaml)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Host to bind to, overriding the configuration
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overriding the configuration
    #[arg(long, short)]
    pub port: Option<u16>,
}

impl ServeArgs {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

pub async fn execute(args: ServeArgs, _json_mode: bool) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    args.apply_overrides(&mut config);
    ConfigLoader::validate(&config)?;

    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;

    if config.tracker.token.is_none() {
        warn!("No tracker token configured; updates will fail until one is provided");
    }

    let tracker: Arc<dyn IssueTracker> = Arc::new(
        GitHubIssueClient::new(config.tracker.clone()).context("Failed to build GitHub client")?,
    );
    let service = Arc::new(UpdateService::new(tracker));
    let server = WebhookServer::new(config.server.clone(), service);

    server
        .serve_with_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Webhook server failed: {e}"))?;

    info!("Webhook server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
