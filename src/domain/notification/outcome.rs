//! Classified notification outcomes handed to the business layer.

use serde::{Deserialize, Serialize};

/// Result of routing a verified notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationOutcome {
    /// A payment changed state; details fetched from the provider.
    PaymentEvent(PaymentDetails),

    /// A merchant order changed state; details fetched from the provider.
    MerchantOrderEvent(MerchantOrderDetails),

    /// Topic not handled by this receiver (or absent).
    Unrecognized { raw_topic: Option<String> },
}

impl NotificationOutcome {
    /// Short label used in log fields.
    pub fn label(&self) -> &'static str {
        match self {
            NotificationOutcome::PaymentEvent(_) => "payment_event",
            NotificationOutcome::MerchantOrderEvent(_) => "merchant_order_event",
            NotificationOutcome::Unrecognized { .. } => "unrecognized",
        }
    }
}

/// Payment details returned by the provider's payment lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub id: String,
    pub status: PaymentStatus,
    pub status_detail: Option<String>,
    pub transaction_amount: f64,
    pub external_reference: Option<String>,
}

/// Merchant order details returned by the provider's order lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantOrderDetails {
    pub id: String,
    pub status: String,
    pub item_count: usize,
}

/// Payment status reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    /// Payment accepted; access can be released.
    Approved,
    /// Awaiting confirmation (e.g. cash or bank transfer).
    Pending,
    Rejected,
    Cancelled,
    /// Any other status, kept verbatim.
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Approved => "approved",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Rejected => "rejected",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "approved" => PaymentStatus::Approved,
            "pending" => PaymentStatus::Pending,
            "rejected" => PaymentStatus::Rejected,
            "cancelled" => PaymentStatus::Cancelled,
            _ => PaymentStatus::Other(raw),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        status.as_str().to_string()
    }
}
