pub mod issue_formatter;
pub mod update_service;

pub use update_service::UpdateService;
