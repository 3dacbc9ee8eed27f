//! NotificationSink port - hands classified outcomes to the business layer.
//!
//! The receiver only guarantees that an outcome reaches the sink after the
//! notification passed verification. What the business layer does with it
//! (releasing access, marking an order paid) is outside this crate.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::notification::NotificationOutcome;

/// Port for delivering notification outcomes.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one outcome.
    ///
    /// An error fails the request with `500`, so the provider redelivers.
    async fn deliver(&self, outcome: &NotificationOutcome) -> Result<(), SinkError>;
}

/// Errors raised by the business layer while handling an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SinkError(pub String);

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
