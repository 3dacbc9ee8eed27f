//! Logging sink - the default business layer.
//!
//! Emits one structured event per outcome. Deployments that need to release
//! access or mark orders paid replace it with their own `NotificationSink`.

use async_trait::async_trait;

use crate::domain::notification::{NotificationOutcome, PaymentDetails, PaymentStatus};
use crate::ports::{NotificationSink, SinkError};

/// Sink that records outcomes as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotificationSink;

impl LoggingNotificationSink {
    pub fn new() -> Self {
        Self
    }

    fn log_payment(payment: &PaymentDetails) {
        tracing::info!(
            payment_id = %payment.id,
            status = payment.status.as_str(),
            external_reference = payment.external_reference.as_deref().unwrap_or(""),
            "Processing payment notification"
        );

        match &payment.status {
            PaymentStatus::Approved => {
                tracing::info!(payment_id = %payment.id, "Payment approved; releasing access")
            }
            PaymentStatus::Pending => {
                tracing::info!(payment_id = %payment.id, "Payment pending; awaiting confirmation")
            }
            PaymentStatus::Rejected => {
                tracing::info!(payment_id = %payment.id, "Payment rejected")
            }
            PaymentStatus::Cancelled => {
                tracing::info!(payment_id = %payment.id, "Payment cancelled")
            }
            PaymentStatus::Other(raw) => {
                tracing::warn!(payment_id = %payment.id, status = %raw, "Unknown payment status")
            }
        }
    }
}

#[async_trait]
impl NotificationSink for LoggingNotificationSink {
    async fn deliver(&self, outcome: &NotificationOutcome) -> Result<(), SinkError> {
        match outcome {
            NotificationOutcome::PaymentEvent(payment) => Self::log_payment(payment),
            NotificationOutcome::MerchantOrderEvent(order) => {
                tracing::info!(
                    merchant_order_id = %order.id,
                    status = %order.status,
                    items = order.item_count,
                    "Processing merchant order notification"
                );
            }
            NotificationOutcome::Unrecognized { raw_topic } => {
                tracing::info!(
                    topic = raw_topic.as_deref().unwrap_or("<none>"),
                    "Ignoring unrecognized notification"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::MerchantOrderDetails;

    fn payment(status: PaymentStatus) -> NotificationOutcome {
        NotificationOutcome::PaymentEvent(PaymentDetails {
            id: "123".to_string(),
            status,
            status_detail: None,
            transaction_amount: 1.0,
            external_reference: None,
        })
    }

    #[tokio::test]
    async fn accepts_every_payment_status() {
        let sink = LoggingNotificationSink::new();
        for status in [
            PaymentStatus::Approved,
            PaymentStatus::Pending,
            PaymentStatus::Rejected,
            PaymentStatus::Cancelled,
            PaymentStatus::Other("refunded".to_string()),
        ] {
            assert!(sink.deliver(&payment(status)).await.is_ok());
        }
    }

    #[tokio::test]
    async fn accepts_orders_and_unrecognized() {
        let sink = LoggingNotificationSink::new();
        let order = NotificationOutcome::MerchantOrderEvent(MerchantOrderDetails {
            id: "9".to_string(),
            status: "closed".to_string(),
            item_count: 2,
        });

        assert!(sink.deliver(&order).await.is_ok());
        assert!(sink
            .deliver(&NotificationOutcome::Unrecognized { raw_topic: None })
            .await
            .is_ok());
    }
}
