use async_trait::async_trait;

use crate::domain::errors::TrackerError;
use crate::domain::models::{CreatedIssue, IssuePayload};

/// Port for the external issue tracker.
///
/// One call creates exactly one issue. Implementations must not retry or
/// batch; the caller controls ordering.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Create an issue
    ///
    /// # Returns
    /// * `Ok(CreatedIssue)` once the tracker has accepted the issue
    /// * `Err(TrackerError)` on rejection, transport failure or missing configuration
    async fn create_issue(&self, issue: &IssuePayload) -> Result<CreatedIssue, TrackerError>;
}
