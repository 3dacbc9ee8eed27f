//! Data Transfer Objects for the webhook endpoints.

use serde::{Deserialize, Serialize};

/// Body returned with `401 Unauthorized`.
///
/// Verification failures are indistinguishable to the caller; the reason is
/// only logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new("Unauthorized")
    }
}

/// Body returned by `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Whether inbound signatures are checked.
    pub verification_enabled: bool,
}
