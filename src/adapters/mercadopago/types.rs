//! Mercado Pago API objects as returned by the read endpoints.
//!
//! Only the fields the receiver forwards are captured; they are mapped to
//! domain types before leaving the adapter.

use serde::{Deserialize, Deserializer};

use crate::domain::notification::{MerchantOrderDetails, PaymentDetails, PaymentStatus};

/// Payment as returned by `GET /v1/payments/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MercadoPagoPayment {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,

    pub status: String,

    #[serde(default)]
    pub status_detail: Option<String>,

    #[serde(default)]
    pub transaction_amount: f64,

    #[serde(default)]
    pub external_reference: Option<String>,
}

impl From<MercadoPagoPayment> for PaymentDetails {
    fn from(payment: MercadoPagoPayment) -> Self {
        PaymentDetails {
            id: payment.id,
            status: PaymentStatus::from(payment.status),
            status_detail: payment.status_detail,
            transaction_amount: payment.transaction_amount,
            external_reference: payment.external_reference,
        }
    }
}

/// Merchant order as returned by `GET /merchant_orders/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MercadoPagoMerchantOrder {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub items: Vec<serde_json::Value>,
}

impl From<MercadoPagoMerchantOrder> for MerchantOrderDetails {
    fn from(order: MercadoPagoMerchantOrder) -> Self {
        MerchantOrderDetails {
            id: order.id,
            status: order.status.unwrap_or_else(|| "unknown".to_string()),
            item_count: order.items.len(),
        }
    }
}

/// Accepts ids sent either as JSON numbers or strings.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}
