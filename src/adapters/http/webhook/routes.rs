//! Axum router configuration for the webhook endpoints.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::handlers::{health, panic_response, receive_notification, WebhookAppState};

/// Create the webhook routes.
///
/// # Routes
/// - `POST /webhook` - Receive provider notifications (signature verified)
/// - `GET /health` - Liveness probe
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new()
        .route("/webhook", post(receive_notification))
        .route("/health", get(health))
}

/// Create the complete application router.
///
/// Requests exceeding `request_timeout` are answered with `408`; a panic
/// while handling a request is answered with `500`.
///
/// # Example
///
/// ```ignore
/// let app = app_router(state, Duration::from_secs(30));
/// axum::serve(listener, app).await?;
/// ```
pub fn app_router(state: WebhookAppState, request_timeout: Duration) -> Router {
    webhook_routes()
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
