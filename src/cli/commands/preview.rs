//! Implementation of the `strategic-relay preview` command.
//!
//! Runs a payload through parsing and formatting and prints the issues it
//! would create. Nothing is sent.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use tokio::fs;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{IssuePayload, UpdateAction};
use crate::services::UpdateService;

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Path to a JSON update payload
    pub payload: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct PreviewOutput {
    pub action: String,
    pub issues: Vec<IssuePayload>,
}

impl CommandOutput for PreviewOutput {
    fn to_human(&self) -> String {
        if self.issues.is_empty() {
            return format!("Action '{}' would create no issues.", self.action);
        }

        let mut lines = vec![format!(
            "Action '{}' would create {} issue(s):",
            self.action,
            self.issues.len()
        )];
        for (i, issue) in self.issues.iter().enumerate() {
            lines.push(String::new());
            lines.push(format!("[{}] {}", i + 1, issue.title));
            lines.push("-".repeat(40));
            lines.push(issue.body.clone());
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Parse a payload and plan its issues.
pub fn build_preview(body: &[u8]) -> Result<PreviewOutput> {
    let action = UpdateAction::from_slice(body)?;
    Ok(PreviewOutput {
        action: action.kind().to_string(),
        issues: UpdateService::plan(&action, Utc::now()),
    })
}

pub async fn execute(args: PreviewArgs, json_mode: bool) -> Result<()> {
    let body = fs::read(&args.payload)
        .await
        .with_context(|| format!("Failed to read payload {}", args.payload.display()))?;

    let preview = build_preview(&body)?;
    output(&preview, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_email_batch() {
        let body = br#"{"action":"send-email","emailRequests":[{"subject":"Board memo"},{}]}"#;
        let preview = build_preview(body).unwrap();

        assert_eq!(preview.action, "send-email");
        assert_eq!(preview.issues.len(), 2);
        assert_eq!(preview.issues[0].title, "Email Request: Board memo");
        assert_eq!(preview.issues[1].title, "Email Request: Strategic Communication");

        let human = preview.to_human();
        assert!(human.contains("would create 2 issue(s)"));
        assert!(human.contains("[1] Email Request: Board memo"));
    }

    #[test]
    fn test_preview_empty_batch() {
        let preview = build_preview(br#"{"action":"send-email","emailRequests":[]}"#).unwrap();
        assert!(preview.issues.is_empty());
        assert_eq!(preview.to_human(), "Action 'send-email' would create no issues.");
    }

    #[test]
    fn test_preview_json_shape() {
        let preview = build_preview(br#"{"action":"dashboard-update"}"#).unwrap();
        let json = preview.to_json();
        assert_eq!(json["action"], "dashboard-update");
        assert!(json["issues"][0]["title"]
            .as_str()
            .unwrap()
            .starts_with("Dashboard Update - "));
    }

    #[test]
    fn test_preview_unknown_action() {
        let err = build_preview(br#"{"action":"nope"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Unknown action type");
    }
}
