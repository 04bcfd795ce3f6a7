//! HTTP webhook for strategic updates.
//!
//! Exposes a single endpoint that accepts `POST` with a JSON update, plus a
//! `/health` check. Every other method on the update path answers `405`
//! with a JSON body; axum's built-in method routing would answer with an
//! empty one. Bodies over `server.max_body_bytes` get a JSON `413`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::errors::RelayError;
use crate::domain::models::{ServerConfig, UpdateAction};
use crate::services::UpdateService;

/// Message returned with every successful update.
pub const SUCCESS_MESSAGE: &str = "Strategic update processed successfully";

/// Success envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

impl SuccessResponse {
    fn now() -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Maps a [`RelayError`] onto a status code and JSON body.
#[derive(Debug)]
pub struct ApiError(pub RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            RelayError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorResponse {
                    error: "Method not allowed".to_string(),
                    details: None,
                },
            ),
            RelayError::UnknownAction => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Unknown action type".to_string(),
                    details: None,
                },
            ),
            RelayError::InvalidPayload(details) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Invalid request payload".to_string(),
                    details: Some(details),
                },
            ),
            err @ RelayError::PayloadTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorResponse {
                    error: "Payload too large".to_string(),
                    details: Some(err.to_string()),
                },
            ),
            RelayError::Tracker(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "Processing failed".to_string(),
                    details: Some(err.to_string()),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Shared state for the webhook server.
struct AppState {
    service: Arc<UpdateService>,
    max_body_bytes: usize,
}

/// Webhook server.
pub struct WebhookServer {
    config: ServerConfig,
    service: Arc<UpdateService>,
}

impl WebhookServer {
    /// Create a new webhook server.
    pub fn new(config: ServerConfig, service: Arc<UpdateService>) -> Self {
        Self { config, service }
    }

    /// Build the router.
    pub fn build_router(&self) -> Router {
        let state = Arc::new(AppState {
            service: Arc::clone(&self.service),
            max_body_bytes: self.config.max_body_bytes,
        });

        let app = Router::new()
            .route(&self.config.path, any(handle_update))
            .route("/health", get(health_check))
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes))
            .with_state(state);

        if self.config.enable_trace {
            app.layer(TraceLayer::new_for_http())
        } else {
            app
        }
    }

    fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.config.host, self.config.port).parse()
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(
        self,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.socket_addr()?;
        let router = self.build_router();

        info!("Strategic update webhook listening on {}{}", addr, self.config.path);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

async fn handle_update(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let span = info_span!("strategic_update", request_id = %Uuid::new_v4(), %method);
    process_update(&state, &method, body).instrument(span).await
}

async fn process_update(
    state: &AppState,
    method: &Method,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if *method != Method::POST {
        return Err(RelayError::MethodNotAllowed.into());
    }

    let body = body.map_err(|rejection| {
        warn!(status = %rejection.status(), "request body rejected");
        ApiError(body_error(&rejection, state.max_body_bytes))
    })?;

    let action = UpdateAction::from_slice(&body).map_err(|e| {
        warn!(error = %e, "rejected update payload");
        ApiError(e)
    })?;

    let created = state.service.process(&action).await?;
    info!(action = %action.kind(), issues = created.len(), "strategic update processed");

    Ok(Json(SuccessResponse::now()))
}

fn body_error(rejection: &BytesRejection, limit: usize) -> RelayError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RelayError::PayloadTooLarge { limit }
    } else {
        RelayError::InvalidPayload(rejection.body_text())
    }
}
