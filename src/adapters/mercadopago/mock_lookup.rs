//! Mock provider lookup for testing.
//!
//! Provides a configurable in-memory implementation of `ProviderLookup`:
//! - Pre-configured payments and merchant orders
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::notification::{MerchantOrderDetails, PaymentDetails};
use crate::ports::{LookupError, ProviderLookup};

/// Mock provider lookup for testing.
///
/// # Example
///
/// ```ignore
/// let lookup = MockProviderLookup::new().with_payment(payment);
///
/// let details = lookup.fetch_payment("123").await?;
/// assert_eq!(lookup.payment_lookups(), vec!["123"]);
/// ```
#[derive(Clone, Default)]
pub struct MockProviderLookup {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    payments: HashMap<String, PaymentDetails>,
    merchant_orders: HashMap<String, MerchantOrderDetails>,

    /// Returned by every lookup while set.
    error: Option<LookupError>,

    payment_lookups: Vec<String>,
    merchant_order_lookups: Vec<String>,
}

impl MockProviderLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a payment to the "API".
    pub fn with_payment(self, payment: PaymentDetails) -> Self {
        self.inner
            .lock()
            .unwrap()
            .payments
            .insert(payment.id.clone(), payment);
        self
    }

    /// Add a merchant order to the "API".
    pub fn with_merchant_order(self, order: MerchantOrderDetails) -> Self {
        self.inner
            .lock()
            .unwrap()
            .merchant_orders
            .insert(order.id.clone(), order);
        self
    }

    /// Fail every lookup with `error`.
    pub fn failing_with(self, error: LookupError) -> Self {
        self.inner.lock().unwrap().error = Some(error);
        self
    }

    /// Ids passed to `fetch_payment`, in call order.
    pub fn payment_lookups(&self) -> Vec<String> {
        self.inner.lock().unwrap().payment_lookups.clone()
    }

    /// Ids passed to `fetch_merchant_order`, in call order.
    pub fn merchant_order_lookups(&self) -> Vec<String> {
        self.inner.lock().unwrap().merchant_order_lookups.clone()
    }
}

#[async_trait]
impl ProviderLookup for MockProviderLookup {
    async fn fetch_payment(&self, id: &str) -> Result<PaymentDetails, LookupError> {
        let mut state = self.inner.lock().unwrap();
        state.payment_lookups.push(id.to_string());

        if let Some(error) = state.error.clone() {
            return Err(error);
        }
        state
            .payments
            .get(id)
            .cloned()
            .ok_or_else(|| LookupError::not_found("payment", id))
    }

    async fn fetch_merchant_order(&self, id: &str) -> Result<MerchantOrderDetails, LookupError> {
        let mut state = self.inner.lock().unwrap();
        state.merchant_order_lookups.push(id.to_string());

        if let Some(error) = state.error.clone() {
            return Err(error);
        }
        state
            .merchant_orders
            .get(id)
            .cloned()
            .ok_or_else(|| LookupError::not_found("merchant_order", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::PaymentStatus;
    use crate::ports::LookupErrorCode;

    fn payment(id: &str) -> PaymentDetails {
        PaymentDetails {
            id: id.to_string(),
            status: PaymentStatus::Pending,
            status_detail: None,
            transaction_amount: 10.0,
            external_reference: None,
        }
    }

    #[tokio::test]
    async fn returns_configured_payment() {
        let lookup = MockProviderLookup::new().with_payment(payment("1"));

        let found = lookup.fetch_payment("1").await.unwrap();

        assert_eq!(found, payment("1"));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let lookup = MockProviderLookup::new();

        let err = lookup.fetch_payment("2").await.unwrap_err();

        assert_eq!(err.code, LookupErrorCode::NotFound);
        assert_eq!(lookup.payment_lookups(), vec!["2".to_string()]);
    }

    #[tokio::test]
    async fn injected_error_wins_over_configured_data() {
        let lookup = MockProviderLookup::new()
            .with_payment(payment("1"))
            .failing_with(LookupError::network("down"));

        let err = lookup.fetch_payment("1").await.unwrap_err();

        assert_eq!(err.code, LookupErrorCode::NetworkError);
    }

    #[tokio::test]
    async fn clones_share_call_log() {
        let lookup = MockProviderLookup::new();
        let handle = lookup.clone();

        let _ = lookup.fetch_merchant_order("7").await;

        assert_eq!(handle.merchant_order_lookups(), vec!["7".to_string()]);
    }
}
