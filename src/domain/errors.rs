//! Domain errors for the strategic update relay.

use thiserror::Error;

/// Failures reported by an issue tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The tracker answered with a non-2xx status
    #[error("GitHub API error: {status} - {body}")]
    Rejected { status: u16, body: String },

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Token or repository identity is not configured
    #[error("Tracker is not configured: {0}")]
    MissingConfiguration(String),

    /// A 2xx response whose body could not be read
    #[error("Invalid tracker response: {0}")]
    InvalidResponse(String),
}

/// Errors surfaced by the webhook relay.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Unknown action type")]
    UnknownAction,

    #[error("Invalid request payload: {0}")]
    InvalidPayload(String),

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_carries_status_and_body() {
        let err = TrackerError::Rejected {
            status: 422,
            body: r#"{"message":"Validation Failed"}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"GitHub API error: 422 - {"message":"Validation Failed"}"#
        );
    }

    #[test]
    fn test_tracker_error_is_transparent() {
        let err: RelayError = TrackerError::Transport("connection refused".to_string()).into();
        assert_eq!(err.to_string(), "Transport error: connection refused");
    }

    #[test]
    fn test_payload_too_large_names_limit() {
        let err = RelayError::PayloadTooLarge { limit: 1024 };
        assert_eq!(err.to_string(), "Request body exceeds 1024 bytes");
    }
}
