//! Provider lookup port - queries the payment provider's read API.
//!
//! Notifications only carry a resource id. The dispatcher uses this port to
//! fetch the full payment or merchant order before handing it to the
//! business layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::notification::{MerchantOrderDetails, PaymentDetails};

/// Port for looking up provider resources by id.
///
/// Implementations must not retry internally: the provider redelivers the
/// notification itself when needed.
#[async_trait]
pub trait ProviderLookup: Send + Sync {
    /// Fetch a payment by provider id.
    async fn fetch_payment(&self, id: &str) -> Result<PaymentDetails, LookupError>;

    /// Fetch a merchant order by provider id.
    async fn fetch_merchant_order(&self, id: &str) -> Result<MerchantOrderDetails, LookupError>;
}

/// Errors from provider lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupError {
    /// Error code for categorization.
    pub code: LookupErrorCode,

    /// Human-readable message.
    pub message: String,
}

impl LookupError {
    pub fn new(code: LookupErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Connection failure or timeout.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(LookupErrorCode::NetworkError, message)
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        Self::new(
            LookupErrorCode::NotFound,
            format!("{} {} not found", resource, id),
        )
    }

    /// Non-success status other than 404.
    pub fn unexpected_status(status: u16, body: impl Into<String>) -> Self {
        Self::new(
            LookupErrorCode::ProviderError,
            format!("provider returned {}: {}", status, body.into()),
        )
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(LookupErrorCode::DecodeError, message)
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for LookupError {}

/// Lookup error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupErrorCode {
    /// Network connectivity issue or timeout.
    NetworkError,

    /// Access token rejected.
    AuthenticationError,

    /// Resource not found.
    NotFound,

    /// Provider returned an unexpected status.
    ProviderError,

    /// Response body could not be decoded.
    DecodeError,
}

impl LookupErrorCode {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LookupErrorCode::NetworkError | LookupErrorCode::ProviderError
        )
    }
}

impl std::fmt::Display for LookupErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LookupErrorCode::NetworkError => "network_error",
            LookupErrorCode::AuthenticationError => "authentication_error",
            LookupErrorCode::NotFound => "not_found",
            LookupErrorCode::ProviderError => "provider_error",
            LookupErrorCode::DecodeError => "decode_error",
        };
        write!(f, "{}", s)
    }
}
