pub mod issue_tracker;

pub use issue_tracker::IssueTracker;
