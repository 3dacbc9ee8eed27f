//! Notification dispatcher - classifies verified notifications and fetches
//! the referenced resource.
//!
//! ## Design
//!
//! Each call is a stateless classification followed by at most one lookup:
//! 1. Classify on `topic`, falling back to `type`
//! 2. For `payment` / `merchant_order`, fetch the resource named by `data.id`
//! 3. Return the outcome, or the reason none applies
//!
//! Lookup failures are absorbed. A failing provider read API says nothing
//! about the notification itself, and failing the request would only make
//! the provider redeliver without fixing the transient error.

use std::sync::Arc;

use crate::ports::{LookupError, ProviderLookup};

use super::outcome::NotificationOutcome;
use super::payload::{Notification, Topic};

/// Terminal state of a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResult {
    /// Classified (and enriched where applicable); hand to the business layer.
    Dispatched(NotificationOutcome),

    /// Known topic without a `data.id`; nothing to fetch, nothing to deliver.
    MissingDataId { topic: Topic },

    /// Lookup failed; the request is still acknowledged.
    FetchFailed {
        topic: Topic,
        resource_id: String,
        error: LookupError,
    },
}

impl DispatchResult {
    /// The outcome to deliver, if any.
    pub fn outcome(&self) -> Option<&NotificationOutcome> {
        match self {
            DispatchResult::Dispatched(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Short label used in log fields.
    pub fn state(&self) -> &'static str {
        match self {
            DispatchResult::Dispatched(NotificationOutcome::Unrecognized { .. }) => {
                "ignored_unclassified"
            }
            DispatchResult::Dispatched(_) => "dispatched",
            DispatchResult::MissingDataId { .. } => "missing_data_id",
            DispatchResult::FetchFailed { .. } => "fetch_failed_acknowledged",
        }
    }
}

/// Routes verified notifications to a fixed set of outcome slots.
#[derive(Clone)]
pub struct NotificationDispatcher {
    lookup: Arc<dyn ProviderLookup>,
}

impl NotificationDispatcher {
    pub fn new(lookup: Arc<dyn ProviderLookup>) -> Self {
        Self { lookup }
    }

    /// Classifies a notification and fetches the referenced resource.
    ///
    /// Never fails: lookup errors are reported as
    /// [`DispatchResult::FetchFailed`].
    pub async fn dispatch(&self, notification: &Notification) -> DispatchResult {
        let topic = match notification.topic() {
            Some(topic) => topic,
            None => {
                tracing::info!("Notification without topic or type");
                return DispatchResult::Dispatched(NotificationOutcome::Unrecognized {
                    raw_topic: None,
                });
            }
        };

        if let Topic::Other(raw) = &topic {
            tracing::info!(topic = %raw, "Unrecognized notification topic");
            return DispatchResult::Dispatched(NotificationOutcome::Unrecognized {
                raw_topic: Some(raw.clone()),
            });
        }

        let Some(resource_id) = notification.data_id() else {
            tracing::info!(topic = topic.as_str(), "Notification without data.id");
            return DispatchResult::MissingDataId { topic };
        };

        let fetched = match topic {
            Topic::Payment => self
                .lookup
                .fetch_payment(&resource_id)
                .await
                .map(NotificationOutcome::PaymentEvent),
            _ => self
                .lookup
                .fetch_merchant_order(&resource_id)
                .await
                .map(NotificationOutcome::MerchantOrderEvent),
        };

        match fetched {
            Ok(outcome) => {
                tracing::debug!(
                    topic = topic.as_str(),
                    resource_id = %resource_id,
                    outcome = outcome.label(),
                    "Notification dispatched"
                );
                DispatchResult::Dispatched(outcome)
            }
            Err(error) => {
                tracing::warn!(
                    topic = topic.as_str(),
                    resource_id = %resource_id,
                    error = %error,
                    retryable = error.is_retryable(),
                    "Provider lookup failed; acknowledging notification"
                );
                DispatchResult::FetchFailed {
                    topic,
                    resource_id,
                    error,
                }
            }
        }
    }
}
