//! HTTP handlers for the webhook endpoints.

use std::any::Any;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::handlers::notification::{
    ReceiveNotificationCommand, ReceiveNotificationHandler,
};
use crate::domain::notification::{NotificationDispatcher, SignatureVerifier, WebhookError};
use crate::ports::{Clock, NotificationSink, ProviderLookup};

use super::dto::{ErrorResponse, HealthResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Read-only after startup; cloned for each request.
#[derive(Clone)]
pub struct WebhookAppState {
    pub verifier: SignatureVerifier,
    pub provider_lookup: Arc<dyn ProviderLookup>,
    pub notification_sink: Arc<dyn NotificationSink>,
    pub clock: Arc<dyn Clock>,
}

impl WebhookAppState {
    pub fn receive_notification_handler(&self) -> ReceiveNotificationHandler {
        ReceiveNotificationHandler::new(
            self.verifier.clone(),
            NotificationDispatcher::new(self.provider_lookup.clone()),
            self.notification_sink.clone(),
            self.clock.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhook - Receive a provider notification
pub async fn receive_notification(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let handler = state.receive_notification_handler();
    let cmd = ReceiveNotificationCommand {
        headers,
        payload: body.to_vec(),
    };

    handler.handle(cmd).await?;

    Ok((StatusCode::OK, "OK"))
}

/// GET /health - Liveness probe
pub async fn health(State(state): State<WebhookAppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        verification_enabled: state.verifier.is_enabled(),
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts webhook errors to HTTP responses.
#[derive(Debug)]
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

/// Turns a panic caught by `CatchPanicLayer` into a `500`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "panic with non-string payload".to_string()
    };

    WebhookApiError::from(WebhookError::Internal(detail)).into_response()
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        match &self.0 {
            WebhookError::Unauthorized(_) => {
                (status, Json(ErrorResponse::unauthorized())).into_response()
            }
            err => {
                tracing::error!(
                    error = %err,
                    retryable = err.is_retryable(),
                    "Notification processing failed"
                );
                (status, "Internal Server Error").into_response()
            }
        }
    }
}
