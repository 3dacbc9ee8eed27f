//! HTTP adapter for the webhook receiver.
//!
//! - `POST /webhook` - Receive provider notifications
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ErrorResponse, HealthResponse};
pub use handlers::{WebhookApiError, WebhookAppState};
pub use routes::{app_router, webhook_routes};
