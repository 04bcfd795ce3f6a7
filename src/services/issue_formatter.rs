//! Issue templates.
//!
//! Every free-text field has a literal fallback so that no issue is sent
//! with a blank section. Empty strings count as absent, and so does a
//! progress of zero.

use chrono::{DateTime, Utc};
use serde_json::{Number, Value};

use crate::domain::models::{
    DashboardData, EmailRequest, IssuePayload, OrderedMap, ProjectUpdate, StrategicAnalysis,
};

pub const NO_PROJECT_UPDATES: &str = "No specific project updates provided";
pub const NO_PROGRESS: &str = "No progress specified";
pub const DEFAULT_PROJECT_CONTEXT: &str = "Strategic context from conversation";
pub const GENERAL_DASHBOARD_UPDATE: &str = "General dashboard update from strategic conversation";
pub const DEFAULT_CONVERSATION_TYPE: &str = "Strategic conversation";
pub const NO_INSIGHTS: &str = "No specific insights captured";
pub const NO_RESEARCH_NEEDS: &str = "No additional research needs identified";
pub const DEFAULT_FOCUS: &str = "Strategic planning and execution";
pub const DEFAULT_DASHBOARD_CONTEXT: &str = "Dashboard refresh from strategic conversation";
pub const DEFAULT_EMAIL_SUBJECT: &str = "Strategic Communication";
pub const DEFAULT_EMAIL_TYPE: &str = "General communication";
pub const DEFAULT_RECIPIENT: &str = "To be determined";
pub const DEFAULT_FRAMEWORK: &str = "Standard professional communication";
pub const DEFAULT_EMAIL_CONTENT: &str = "Content to be drafted from strategic conversation";

/// Insights longer than this (in characters) get a follow-up issue.
pub const FOLLOW_UP_THRESHOLD: usize = 100;

/// Number of insight characters carried into the follow-up issue.
pub const FOLLOW_UP_EXCERPT_CHARS: usize = 200;

const FOOTER: &str = "*Generated automatically from a strategic conversation.*";

fn text_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value {
        Some(s) if !s.is_empty() => s,
        _ => fallback,
    }
}

fn render_progress(progress: Option<&Number>) -> String {
    match progress {
        Some(p) if p.as_f64() != Some(0.0) => p.to_string(),
        _ => NO_PROGRESS.to_string(),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn date_stamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// One line per project, in the order the caller sent them.
pub fn format_project_updates(projects: Option<&OrderedMap<ProjectUpdate>>) -> String {
    match projects {
        Some(projects) if !projects.is_empty() => projects
            .iter()
            .map(|(name, update)| {
                format!(
                    "**{}:** {}% - {}",
                    name,
                    render_progress(update.progress.as_ref()),
                    text_or(update.context.as_deref(), DEFAULT_PROJECT_CONTEXT)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        _ => NO_PROJECT_UPDATES.to_string(),
    }
}

/// `<project>: <value>` per line, or the general fallback line.
pub fn format_dashboard_updates(data: Option<&DashboardData>) -> String {
    match data.and_then(|d| d.projects.as_ref()) {
        Some(projects) if !projects.is_empty() => projects
            .iter()
            .map(|(name, value)| format!("{}: {}", name, render_value(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => GENERAL_DASHBOARD_UPDATE.to_string(),
    }
}

pub fn strategic_analysis_issue(analysis: &StrategicAnalysis, now: DateTime<Utc>) -> IssuePayload {
    let title = format!("Strategic Analysis - {}", date_stamp(now));
    let body = format!(
        "## Strategic Analysis\n\
         \n\
         **Conversation Type:** {conversation}\n\
         **Generated:** {generated}\n\
         \n\
         ### Key Insights\n\
         {insights}\n\
         \n\
         ### Project Updates\n\
         {projects}\n\
         \n\
         ### Research Needs\n\
         {research}\n\
         \n\
         ---\n\
         {FOOTER}",
        conversation = text_or(analysis.conversation_type.as_deref(), DEFAULT_CONVERSATION_TYPE),
        generated = now.format("%Y-%m-%d %H:%M UTC"),
        insights = text_or(analysis.strategic_insights.as_deref(), NO_INSIGHTS),
        projects = format_project_updates(analysis.project_updates.as_ref()),
        research = text_or(analysis.research_needs.as_deref(), NO_RESEARCH_NEEDS),
    );
    IssuePayload::new(title, body)
}

/// Follow-up issue for long insights, carrying the first 200 characters.
///
/// Returns `None` when the insights are absent or no longer than 100
/// characters.
pub fn insight_follow_up_issue(insights: Option<&str>, now: DateTime<Utc>) -> Option<IssuePayload> {
    let insights = insights?;
    if insights.chars().count() <= FOLLOW_UP_THRESHOLD {
        return None;
    }

    let excerpt: String = insights.chars().take(FOLLOW_UP_EXCERPT_CHARS).collect();
    let title = format!("Strategic Insight Follow-up - {}", date_stamp(now));
    let body = format!(
        "## Strategic Insight Follow-up\n\
         \n\
         {excerpt}\n\
         \n\
         ### Next Steps\n\
         Review the full strategic analysis created alongside this issue and break the insight into actionable work.\n\
         \n\
         ---\n\
         {FOOTER}"
    );
    Some(IssuePayload::new(title, body))
}

pub fn dashboard_issue(data: Option<&DashboardData>, now: DateTime<Utc>) -> IssuePayload {
    let title = format!("Dashboard Update - {}", date_stamp(now));
    let body = format!(
        "## Dashboard Update\n\
         \n\
         **Current Focus:** {focus}\n\
         \n\
         ### Project Status\n\
         {projects}\n\
         \n\
         ### Context\n\
         {context}\n\
         \n\
         ---\n\
         {FOOTER}",
        focus = text_or(data.and_then(|d| d.current_focus.as_deref()), DEFAULT_FOCUS),
        projects = format_dashboard_updates(data),
        context = text_or(data.and_then(|d| d.context.as_deref()), DEFAULT_DASHBOARD_CONTEXT),
    );
    IssuePayload::new(title, body)
}

pub fn email_issue(email: &EmailRequest) -> IssuePayload {
    let subject = text_or(email.subject.as_deref(), DEFAULT_EMAIL_SUBJECT);
    let title = format!("Email Request: {subject}");
    let body = format!(
        "## Email Request\n\
         \n\
         **Type:** {kind}\n\
         **Recipient:** {recipient}\n\
         **Framework:** {framework}\n\
         **Subject:** {subject}\n\
         \n\
         ### Content\n\
         {content}\n\
         \n\
         ---\n\
         {FOOTER}",
        kind = text_or(email.kind.as_deref(), DEFAULT_EMAIL_TYPE),
        recipient = text_or(email.recipient.as_deref(), DEFAULT_RECIPIENT),
        framework = text_or(email.framework.as_deref(), DEFAULT_FRAMEWORK),
        content = text_or(email.content.as_deref(), DEFAULT_EMAIL_CONTENT),
    );
    IssuePayload::new(title, body)
}
