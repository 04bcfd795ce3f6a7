pub mod config;
pub mod issue;
pub mod update;

pub use config::{Config, LoggingConfig, ServerConfig, TrackerConfig};
pub use issue::{CreatedIssue, IssuePayload};
pub use update::{
    ActionKind, ComplexUpdate, DashboardData, DashboardUpdate, EmailBatch, EmailRequest,
    OrderedMap, ProjectUpdate, StrategicAnalysis, UpdateAction,
};
