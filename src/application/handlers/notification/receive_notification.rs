//! ReceiveNotificationHandler - Command handler for inbound provider notifications.

use std::sync::Arc;

use http::HeaderMap;

use crate::domain::notification::{
    DispatchResult, IncomingRequest, NotificationDispatcher, SignatureVerifier, WebhookError,
};
use crate::ports::{Clock, NotificationSink};

/// Command to handle one notification delivery.
#[derive(Debug, Clone)]
pub struct ReceiveNotificationCommand {
    /// Request headers (signature and request id among them).
    pub headers: HeaderMap,
    /// Raw JSON body.
    pub payload: Vec<u8>,
}

/// Result of notification processing.
///
/// Every variant is acknowledged with `200 OK`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiveNotificationResult {
    pub dispatch: DispatchResult,
    /// Whether an outcome was handed to the sink.
    pub delivered: bool,
}

/// Handler for processing provider notifications.
///
/// Verifies the signature, classifies and enriches the notification, then
/// hands the outcome to the business layer.
pub struct ReceiveNotificationHandler {
    verifier: SignatureVerifier,
    dispatcher: NotificationDispatcher,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl ReceiveNotificationHandler {
    pub fn new(
        verifier: SignatureVerifier,
        dispatcher: NotificationDispatcher,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            verifier,
            dispatcher,
            sink,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReceiveNotificationCommand,
    ) -> Result<ReceiveNotificationResult, WebhookError> {
        // 1. Parse the body (the signed manifest needs data.id)
        let request = IncomingRequest::from_raw(cmd.headers, &cmd.payload)?;

        // 2. Verify signature and freshness
        self.verifier.verify(&request, self.clock.now_unix())?;

        // 3. Classify and fetch
        let notification = request.notification()?;
        tracing::info!(
            topic = notification.classification_key().unwrap_or("<none>"),
            action = notification.action.as_deref().unwrap_or(""),
            data_id = notification.data_id().as_deref().unwrap_or(""),
            "Notification received"
        );
        let dispatch = self.dispatcher.dispatch(&notification).await;

        // 4. Hand off to the business layer
        let delivered = match dispatch.outcome() {
            Some(outcome) => {
                self.sink.deliver(outcome).await.map_err(|e| {
                    tracing::error!(error = %e, outcome = outcome.label(), "Sink rejected outcome");
                    WebhookError::Delivery(e.to_string())
                })?;
                true
            }
            None => false,
        };

        tracing::info!(state = dispatch.state(), delivered, "Notification processed");

        Ok(ReceiveNotificationResult {
            dispatch,
            delivered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::mercadopago::MockProviderLookup;
    use crate::adapters::sink::InMemoryNotificationSink;
    use crate::domain::notification::{
        build_manifest, compute_signature, NotificationOutcome, PaymentDetails, PaymentStatus,
        VerificationError,
    };
    use crate::ports::{LookupError, SinkError};
    use http::HeaderValue;
    use serde_json::json;

    const SECRET: &str = "s3cr3t";
    const NOW: i64 = 1_700_000_000;

    fn payment(id: &str) -> PaymentDetails {
        PaymentDetails {
            id: id.to_string(),
            status: PaymentStatus::Approved,
            status_detail: Some("accredited".to_string()),
            transaction_amount: 49.9,
            external_reference: Some("order-1".to_string()),
        }
    }

    fn signed_headers(data_id: &str, request_id: &str, ts: i64) -> HeaderMap {
        let manifest = build_manifest(data_id, request_id, &ts.to_string());
        let v1 = compute_signature(SECRET, &manifest);
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-signature",
            HeaderValue::from_str(&format!("ts={},v1={}", ts, v1)).unwrap(),
        );
        headers.insert("x-request-id", HeaderValue::from_str(request_id).unwrap());
        headers
    }

    fn payload(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    struct Fixture {
        lookup: MockProviderLookup,
        sink: InMemoryNotificationSink,
        handler: ReceiveNotificationHandler,
    }

    fn fixture(
        verifier: SignatureVerifier,
        lookup: MockProviderLookup,
        sink: InMemoryNotificationSink,
    ) -> Fixture {
        let handler = ReceiveNotificationHandler::new(
            verifier,
            NotificationDispatcher::new(Arc::new(lookup.clone())),
            Arc::new(sink.clone()),
            Arc::new(FixedClock::at(NOW)),
        );
        Fixture {
            lookup,
            sink,
            handler,
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Verified Delivery Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn signed_payment_is_fetched_and_delivered() {
        let f = fixture(
            SignatureVerifier::new(SECRET),
            MockProviderLookup::new().with_payment(payment("123")),
            InMemoryNotificationSink::new(),
        );

        let result = f
            .handler
            .handle(ReceiveNotificationCommand {
                headers: signed_headers("123", "r1", NOW),
                payload: payload(json!({"type": "payment", "data": {"id": "123"}})),
            })
            .await
            .unwrap();

        assert!(result.delivered);
        assert_eq!(
            f.sink.outcomes(),
            vec![NotificationOutcome::PaymentEvent(payment("123"))]
        );
    }

    #[tokio::test]
    async fn unrecognized_topic_is_delivered_without_lookup() {
        let f = fixture(
            SignatureVerifier::disabled(),
            MockProviderLookup::new(),
            InMemoryNotificationSink::new(),
        );

        let result = f
            .handler
            .handle(ReceiveNotificationCommand {
                headers: HeaderMap::new(),
                payload: payload(json!({"type": "plan", "data": {"id": "1"}})),
            })
            .await
            .unwrap();

        assert_eq!(result.dispatch.state(), "ignored_unclassified");
        assert_eq!(f.sink.delivered_count(), 1);
        assert!(f.lookup.payment_lookups().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_is_acknowledged_without_delivery() {
        let f = fixture(
            SignatureVerifier::disabled(),
            MockProviderLookup::new().failing_with(LookupError::network("timeout")),
            InMemoryNotificationSink::new(),
        );

        let result = f
            .handler
            .handle(ReceiveNotificationCommand {
                headers: HeaderMap::new(),
                payload: payload(json!({"topic": "merchant_order", "data": {"id": "9"}})),
            })
            .await
            .unwrap();

        assert!(!result.delivered);
        assert_eq!(result.dispatch.state(), "fetch_failed_acknowledged");
        assert_eq!(f.sink.delivered_count(), 0);
    }

    // ══════════════════════════════════════════════════════════════
    // Rejection Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn stale_signature_is_rejected_before_dispatch() {
        let f = fixture(
            SignatureVerifier::new(SECRET),
            MockProviderLookup::new().with_payment(payment("123")),
            InMemoryNotificationSink::new(),
        );

        let err = f
            .handler
            .handle(ReceiveNotificationCommand {
                headers: signed_headers("123", "r1", NOW - 600),
                payload: payload(json!({"type": "payment", "data": {"id": "123"}})),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            WebhookError::Unauthorized(VerificationError::StaleTimestamp)
        );
        assert!(f.lookup.payment_lookups().is_empty());
        assert_eq!(f.sink.delivered_count(), 0);
    }

    #[tokio::test]
    async fn missing_headers_are_rejected_when_enabled() {
        let f = fixture(
            SignatureVerifier::new(SECRET),
            MockProviderLookup::new(),
            InMemoryNotificationSink::new(),
        );

        let err = f
            .handler
            .handle(ReceiveNotificationCommand {
                headers: HeaderMap::new(),
                payload: payload(json!({"type": "payment", "data": {"id": "1"}})),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            WebhookError::Unauthorized(VerificationError::MissingHeaders)
        );
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let f = fixture(
            SignatureVerifier::disabled(),
            MockProviderLookup::new(),
            InMemoryNotificationSink::new(),
        );

        let err = f
            .handler
            .handle(ReceiveNotificationCommand {
                headers: HeaderMap::new(),
                payload: b"{not json".to_vec(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, WebhookError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn sink_failure_is_delivery_error() {
        let f = fixture(
            SignatureVerifier::disabled(),
            MockProviderLookup::new().with_payment(payment("123")),
            InMemoryNotificationSink::failing_with(SinkError::new("ledger offline")),
        );

        let err = f
            .handler
            .handle(ReceiveNotificationCommand {
                headers: HeaderMap::new(),
                payload: payload(json!({"topic": "payment", "data": {"id": "123"}})),
            })
            .await
            .unwrap_err();

        assert_eq!(err, WebhookError::Delivery("ledger offline".to_string()));
        assert!(err.is_retryable());
    }
}
