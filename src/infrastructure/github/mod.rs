//! GitHub issue tracker adapter
//!
//! Implements the domain [`IssueTracker`](crate::domain::ports::IssueTracker)
//! port over the GitHub REST v3 issues endpoint.

pub mod client;

pub use client::{GitHubIssueClient, GITHUB_V3_MEDIA_TYPE};
