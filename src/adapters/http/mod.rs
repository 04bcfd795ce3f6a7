//! HTTP surface of the relay.

pub mod webhook;

pub use webhook::{ApiError, ErrorResponse, SuccessResponse, WebhookServer, SUCCESS_MESSAGE};
