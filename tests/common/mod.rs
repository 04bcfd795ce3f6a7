//! Common test utilities for integration tests
//!
//! Provides a recording issue tracker and helpers for driving the webhook
//! router in-process.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use strategic_relay::domain::models::ServerConfig;
use strategic_relay::{CreatedIssue, IssuePayload, IssueTracker, TrackerError, UpdateService, WebhookServer};

/// Path the test router mounts the webhook at
pub const WEBHOOK_PATH: &str = "/api/strategic-update";

/// Tracker that records every issue and can reject the nth call.
#[derive(Default)]
pub struct RecordingTracker {
    issues: Mutex<Vec<IssuePayload>>,
    reject_at: Option<usize>,
}

impl RecordingTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reject the call with this zero-based index with a 422
    pub fn rejecting_at(index: usize) -> Arc<Self> {
        Arc::new(Self {
            issues: Mutex::new(Vec::new()),
            reject_at: Some(index),
        })
    }

    pub fn issues(&self) -> Vec<IssuePayload> {
        self.issues.lock().unwrap().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.issues().into_iter().map(|i| i.title).collect()
    }
}

#[async_trait]
impl IssueTracker for RecordingTracker {
    async fn create_issue(&self, issue: &IssuePayload) -> Result<CreatedIssue, TrackerError> {
        let mut issues = self.issues.lock().unwrap();
        if self.reject_at == Some(issues.len()) {
            return Err(TrackerError::Rejected {
                status: 422,
                body: r#"{"message":"Validation Failed"}"#.to_string(),
            });
        }
        issues.push(issue.clone());
        Ok(CreatedIssue {
            number: Some(issues.len() as u64),
            html_url: Some(format!("https://github.test/acme/roadmap/issues/{}", issues.len())),
        })
    }
}

/// Build the webhook router around any tracker
pub fn router(tracker: Arc<dyn IssueTracker>) -> Router {
    let config = ServerConfig {
        path: WEBHOOK_PATH.to_string(),
        enable_trace: false,
        ..Default::default()
    };
    WebhookServer::new(config, Arc::new(UpdateService::new(tracker))).build_router()
}

/// Send one request and return status plus parsed JSON body
pub async fn send(router: Router, method: Method, body: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(WEBHOOK_PATH)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// POST a JSON value to the webhook
pub async fn post(router: Router, body: &serde_json::Value) -> (StatusCode, serde_json::Value) {
    send(router, Method::POST, &body.to_string()).await
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
