use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient, Response};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::TrackerError;
use crate::domain::models::{CreatedIssue, IssuePayload, TrackerConfig};
use crate::domain::ports::IssueTracker;
use crate::infrastructure::logging::SecretScrubber;

/// Media type for the GitHub REST v3 JSON API
pub const GITHUB_V3_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// HTTP client for the GitHub issues API
///
/// Owns an injected [`TrackerConfig`]. Token and repository identity are
/// checked on every call, so a relay started without them still serves
/// requests and reports the gap per request.
pub struct GitHubIssueClient {
    http_client: ReqwestClient,
    api_base: String,
    owner: Option<String>,
    repo: Option<String>,
    token: Option<String>,
    scrubber: SecretScrubber,
}

impl GitHubIssueClient {
    /// Create a new GitHub issue client
    ///
    /// # Arguments
    /// * `config` - Tracker configuration
    ///
    /// # Returns
    /// * `Result<Self, TrackerError>` - Client instance, or a transport error if
    ///   the HTTP client cannot be built
    pub fn new(config: TrackerConfig) -> Result<Self, TrackerError> {
        info!(
            "Initializing GitHub issue client: api_base={}, repository={}/{}, token_configured={}",
            config.api_base,
            config.owner.as_deref().unwrap_or("<unset>"),
            config.repo.as_deref().unwrap_or("<unset>"),
            config.token.is_some()
        );

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(GITHUB_V3_MEDIA_TYPE),
        );

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| TrackerError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            owner: non_empty(config.owner),
            repo: non_empty(config.repo),
            token: non_empty(config.token),
            scrubber: SecretScrubber::new(),
        })
    }

    /// Resolve `(owner, repo, token)` or report what is missing
    fn credentials(&self) -> Result<(&str, &str, &str), TrackerError> {
        let owner = self
            .owner
            .as_deref()
            .ok_or_else(|| TrackerError::MissingConfiguration("repository owner is not set".to_string()))?;
        let repo = self
            .repo
            .as_deref()
            .ok_or_else(|| TrackerError::MissingConfiguration("repository name is not set".to_string()))?;
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| TrackerError::MissingConfiguration("access token is not set".to_string()))?;
        Ok((owner, repo, token))
    }

    fn issues_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/issues", self.api_base, owner, repo)
    }

    /// Handle HTTP response and convert to typed result
    async fn handle_response(&self, response: Response) -> Result<CreatedIssue, TrackerError> {
        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            warn!("GitHub API error ({}): {}", status, self.scrubber.scrub_message(&body));
            return Err(TrackerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TrackerError::InvalidResponse(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(CreatedIssue::default());
        }
        serde_json::from_str(&body).map_err(|e| TrackerError::InvalidResponse(e.to_string()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl IssueTracker for GitHubIssueClient {
    #[instrument(skip(self, issue), fields(title = %issue.title))]
    async fn create_issue(&self, issue: &IssuePayload) -> Result<CreatedIssue, TrackerError> {
        let (owner, repo, token) = self.credentials()?;
        let url = self.issues_url(owner, repo);

        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .header(header::AUTHORIZATION, format!("token {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .json(issue)
            .send()
            .await
            .map_err(|e| TrackerError::Transport(e.to_string()))?;

        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TrackerConfig {
        TrackerConfig {
            api_base: "https://api.github.test/".to_string(),
            owner: Some("acme".to_string()),
            repo: Some("strategy".to_string()),
            token: Some("ghp_test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_client_creation() {
        let client = GitHubIssueClient::new(config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_issues_url_trims_trailing_slash() {
        let client = GitHubIssueClient::new(config()).unwrap();
        assert_eq!(
            client.issues_url("acme", "strategy"),
            "https://api.github.test/repos/acme/strategy/issues"
        );
    }

    #[test]
    fn test_missing_token_is_reported() {
        let client = GitHubIssueClient::new(TrackerConfig {
            token: None,
            ..config()
        })
        .unwrap();
        assert!(matches!(
            client.credentials(),
            Err(TrackerError::MissingConfiguration(msg)) if msg.contains("token")
        ));
    }

    #[test]
    fn test_blank_repository_counts_as_missing() {
        let client = GitHubIssueClient::new(TrackerConfig {
            repo: Some("  ".to_string()),
            ..config()
        })
        .unwrap();
        assert!(matches!(
            client.credentials(),
            Err(TrackerError::MissingConfiguration(msg)) if msg.contains("repository name")
        ));
    }
}
