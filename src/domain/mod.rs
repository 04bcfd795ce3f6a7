//! Domain layer for the strategic update relay
//!
//! Payload models, the issue tracker port and the error taxonomy. Nothing in
//! here performs I/O.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{RelayError, RelayResult, TrackerError};
