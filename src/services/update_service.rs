//! Update service: turns a validated update into issues and sends them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::RelayResult;
use crate::domain::models::{
    ComplexUpdate, CreatedIssue, DashboardUpdate, EmailBatch, IssuePayload, StrategicAnalysis,
    UpdateAction,
};
use crate::domain::ports::IssueTracker;
use crate::services::issue_formatter;

/// Dispatches update actions to the issue tracker.
///
/// Issues from one update are created strictly one after another, in plan
/// order. The first failure stops the run; issues already created stay
/// created.
pub struct UpdateService {
    tracker: Arc<dyn IssueTracker>,
}

impl UpdateService {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }

    /// Build the ordered list of issues an update produces.
    pub fn plan(action: &UpdateAction, now: DateTime<Utc>) -> Vec<IssuePayload> {
        match action {
            UpdateAction::StrategicAnalysis(analysis) => plan_strategic_analysis(analysis, now),
            UpdateAction::DashboardUpdate(update) => plan_dashboard_update(update, now),
            UpdateAction::SendEmail(batch) => plan_emails(batch),
            UpdateAction::ComplexUpdate(update) => plan_complex_update(update, now),
        }
    }

    /// Process an update using the current time for titles.
    pub async fn process(&self, action: &UpdateAction) -> RelayResult<Vec<CreatedIssue>> {
        self.process_at(action, Utc::now()).await
    }

    #[instrument(skip(self, action, now), fields(action = %action.kind()))]
    pub async fn process_at(
        &self,
        action: &UpdateAction,
        now: DateTime<Utc>,
    ) -> RelayResult<Vec<CreatedIssue>> {
        let plan = Self::plan(action, now);
        debug!(issues = plan.len(), "planned issues");

        let mut created = Vec::with_capacity(plan.len());
        for (index, issue) in plan.iter().enumerate() {
            match self.tracker.create_issue(issue).await {
                Ok(ack) => {
                    info!(
                        index,
                        title = %issue.title,
                        number = ?ack.number,
                        url = ?ack.html_url,
                        "issue created"
                    );
                    created.push(ack);
                }
                Err(e) => {
                    warn!(
                        index,
                        title = %issue.title,
                        skipped = plan.len() - index - 1,
                        error = %e,
                        "issue creation failed, aborting remaining issues"
                    );
                    return Err(e.into());
                }
            }
        }

        Ok(created)
    }
}

fn plan_strategic_analysis(analysis: &StrategicAnalysis, now: DateTime<Utc>) -> Vec<IssuePayload> {
    let mut issues = vec![issue_formatter::strategic_analysis_issue(analysis, now)];
    if let Some(follow_up) =
        issue_formatter::insight_follow_up_issue(analysis.strategic_insights.as_deref(), now)
    {
        issues.push(follow_up);
    }
    issues
}

fn plan_dashboard_update(update: &DashboardUpdate, now: DateTime<Utc>) -> Vec<IssuePayload> {
    vec![issue_formatter::dashboard_issue(update.dashboard_data.as_ref(), now)]
}

fn plan_emails(batch: &EmailBatch) -> Vec<IssuePayload> {
    batch
        .email_requests
        .iter()
        .map(issue_formatter::email_issue)
        .collect()
}

/// Dashboard first, then strategic analysis, then emails.
fn plan_complex_update(update: &ComplexUpdate, now: DateTime<Utc>) -> Vec<IssuePayload> {
    let mut issues = Vec::new();

    if let Some(data) = &update.dashboard_data {
        issues.push(issue_formatter::dashboard_issue(Some(data), now));
    }

    if let Some(analysis) = update.strategic_part() {
        issues.extend(plan_strategic_analysis(&analysis, now));
    }

    if !update.email_requests.is_empty() {
        issues.extend(update.email_requests.iter().map(issue_formatter::email_issue));
    }

    issues
}
