//! Error types for notification verification and handling.
//!
//! Verification failures are kept distinguishable for diagnostics but all
//! collapse to a single `401 Unauthorized` on the wire.

use axum::http::StatusCode;
use thiserror::Error;

/// Reasons a signed notification is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// `x-signature` or `x-request-id` header is absent.
    #[error("Missing signature headers")]
    MissingHeaders,

    /// `x-signature` lacks a usable `ts` or `v1` segment.
    #[error("Malformed signature header")]
    MalformedSignature,

    /// Signature timestamp is more than five minutes away from now.
    #[error("Stale signature timestamp")]
    StaleTimestamp,

    /// Computed digest does not match the provided `v1` hash.
    #[error("Signature mismatch")]
    SignatureMismatch,
}

impl VerificationError {
    /// Short machine-readable tag used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            VerificationError::MissingHeaders => "missing_headers",
            VerificationError::MalformedSignature => "malformed_signature",
            VerificationError::StaleTimestamp => "stale_timestamp",
            VerificationError::SignatureMismatch => "signature_mismatch",
        }
    }
}

/// Errors that terminate processing of an inbound notification.
///
/// Lookup failures against the provider API are deliberately absent: the
/// dispatcher absorbs them and the request is still acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// Signature verification failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] VerificationError),

    /// Body is not valid JSON or does not match the notification shape.
    #[error("Malformed body: {0}")]
    MalformedBody(String),

    /// The business collaborator rejected the outcome.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Any other unexpected failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebhookError {
    /// Maps the error to the HTTP status returned to the provider.
    ///
    /// The provider retries on any non-2xx response, so only authentication
    /// failures are reported as a client error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            WebhookError::MalformedBody(_)
            | WebhookError::Delivery(_)
            | WebhookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns true if provider redelivery could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Delivery(_) | WebhookError::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ══════════════════════════════════════════════════════════════
    // Display Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verification_errors_display_correctly() {
        assert_eq!(
            VerificationError::MissingHeaders.to_string(),
            "Missing signature headers"
        );
        assert_eq!(
            VerificationError::StaleTimestamp.to_string(),
            "Stale signature timestamp"
        );
    }

    #[test]
    fn unauthorized_wraps_verification_reason() {
        let err = WebhookError::from(VerificationError::SignatureMismatch);
        assert_eq!(err.to_string(), "Unauthorized: Signature mismatch");
    }

    #[test]
    fn malformed_body_displays_message() {
        let err = WebhookError::MalformedBody("expected value at line 1".to_string());
        assert_eq!(err.to_string(), "Malformed body: expected value at line 1");
    }

    #[test]
    fn verification_kinds_are_distinct() {
        let kinds = [
            VerificationError::MissingHeaders.kind(),
            VerificationError::MalformedSignature.kind(),
            VerificationError::StaleTimestamp.kind(),
            VerificationError::SignatureMismatch.kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in kinds.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Status Code Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn every_verification_failure_returns_unauthorized() {
        for reason in [
            VerificationError::MissingHeaders,
            VerificationError::MalformedSignature,
            VerificationError::StaleTimestamp,
            VerificationError::SignatureMismatch,
        ] {
            assert_eq!(
                WebhookError::Unauthorized(reason).status_code(),
                StatusCode::UNAUTHORIZED
            );
        }
    }

    #[test]
    fn malformed_body_returns_internal_error() {
        let err = WebhookError::MalformedBody("not json".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn delivery_failure_returns_internal_error() {
        let err = WebhookError::Delivery("fulfillment offline".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // ══════════════════════════════════════════════════════════════
    // Retryability Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn unauthorized_is_not_retryable() {
        let err = WebhookError::Unauthorized(VerificationError::StaleTimestamp);
        assert!(!err.is_retryable());
    }

    #[test]
    fn malformed_body_is_not_retryable() {
        let err = WebhookError::MalformedBody("bad".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn delivery_failure_is_retryable() {
        let err = WebhookError::Delivery("timeout".to_string());
        assert!(err.is_retryable());
    }
}
