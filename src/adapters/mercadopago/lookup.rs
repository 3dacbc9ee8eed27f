//! Mercado Pago lookup adapter.
//!
//! Implements the `ProviderLookup` port against the Mercado Pago REST API:
//! - `GET /v1/payments/{id}`
//! - `GET /merchant_orders/{id}`
//!
//! Requests authenticate with the account access token as a bearer token
//! and are bounded by a client-wide timeout (5 seconds by default). No
//! retries are attempted; the provider redelivers notifications itself.
//!
//! # Configuration
//!
//! ```ignore
//! let config = MercadoPagoConfig::new(access_token);
//! let lookup = MercadoPagoLookup::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::domain::notification::{MerchantOrderDetails, PaymentDetails};
use crate::ports::{LookupError, LookupErrorCode, ProviderLookup};

use super::types::{MercadoPagoMerchantOrder, MercadoPagoPayment};

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.mercadopago.com";

/// Default request timeout (5 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Mercado Pago API configuration.
#[derive(Clone)]
pub struct MercadoPagoConfig {
    /// Account access token.
    access_token: SecretString,

    /// Base URL for the API (overridable for tests).
    api_base_url: String,

    /// Per-request timeout.
    timeout: Duration,
}

impl MercadoPagoConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::new(access_token.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Mercado Pago lookup adapter.
pub struct MercadoPagoLookup {
    config: MercadoPagoConfig,
    base_url: Url,
    http_client: reqwest::Client,
}

impl MercadoPagoLookup {
    /// Create a new adapter with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` if the base URL is unusable or the HTTP
    /// client cannot be built.
    pub fn new(config: MercadoPagoConfig) -> Result<Self, LookupError> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| LookupError::network(format!("invalid API base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(LookupError::network(format!(
                "API base URL cannot carry a path: {}",
                config.api_base_url
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LookupError::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            base_url,
            http_client,
        })
    }

    /// Builds `{base}/{collection...}/{id}`, percent-encoding the id.
    ///
    /// `/`, `?` and `#` inside the id are escaped, so it can never leave its
    /// resource path. Dot segments would be normalized away and are refused.
    fn endpoint(
        &self,
        collection: &[&str],
        resource: &str,
        id: &str,
    ) -> Result<Url, LookupError> {
        if matches!(id, "" | "." | "..") {
            return Err(LookupError::not_found(resource, id));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::network("API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(collection)
            .push(id);
        Ok(url)
    }

    /// GETs `url` and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        resource: &str,
        id: &str,
    ) -> Result<T, LookupError> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(self.config.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| LookupError::network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::not_found(resource, id));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(LookupError::new(
                LookupErrorCode::AuthenticationError,
                format!("access token rejected ({})", status.as_u16()),
            ));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                resource,
                id,
                status = status.as_u16(),
                error = %error_text,
                "Mercado Pago lookup failed"
            );
            return Err(LookupError::unexpected_status(status.as_u16(), error_text));
        }

        response.json::<T>().await.map_err(|e| {
            LookupError::decode(format!("failed to parse {} response: {}", resource, e))
        })
    }
}

#[async_trait]
impl ProviderLookup for MercadoPagoLookup {
    async fn fetch_payment(&self, id: &str) -> Result<PaymentDetails, LookupError> {
        let payment: MercadoPagoPayment = self
            .get_json(self.endpoint(&["v1", "payments"], "payment", id)?, "payment", id)
            .await?;
        Ok(payment.into())
    }

    async fn fetch_merchant_order(&self, id: &str) -> Result<MerchantOrderDetails, LookupError> {
        let order: MercadoPagoMerchantOrder = self
            .get_json(
                self.endpoint(&["merchant_orders"], "merchant_order", id)?,
                "merchant_order",
                id,
            )
            .await?;
        Ok(order.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::PaymentStatus;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    const TOKEN: &str = "APP_USR-test-token";

    async fn payment_route(Path(id): Path<String>, headers: HeaderMap) -> impl IntoResponse {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == format!("Bearer {}", TOKEN))
            .unwrap_or(false);
        if !authorized {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        match id.as_str() {
            "123" => Json(json!({
                "id": 123,
                "status": "approved",
                "status_detail": "accredited",
                "transaction_amount": 100.0,
                "external_reference": "REF_1"
            }))
            .into_response(),
            "broken" => (StatusCode::OK, "not json").into_response(),
            "boom" => (StatusCode::BAD_GATEWAY, "upstream down").into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        }
    }

    async fn account_route() -> impl IntoResponse {
        Json(json!({ "id": 777, "status": "account_details" }))
    }

    async fn merchant_order_route(Path(id): Path<String>) -> impl IntoResponse {
        Json(json!({ "id": id.parse::<u64>().unwrap_or(0), "status": "opened", "items": [{}] }))
    }

    /// Serves a fake provider API on an ephemeral port.
    async fn spawn_provider() -> String {
        let app = Router::new()
            .route("/v1/payments/:id", get(payment_route))
            .route("/merchant_orders/:id", get(merchant_order_route))
            .route("/users/me", get(account_route));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn lookup(base_url: &str, token: &str) -> MercadoPagoLookup {
        MercadoPagoLookup::new(MercadoPagoConfig::new(token).with_base_url(base_url)).unwrap()
    }

    // ══════════════════════════════════════════════════════════════
    // Configuration Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn config_defaults() {
        let config = MercadoPagoConfig::new(TOKEN);
        assert_eq!(config.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn rejects_unusable_base_url() {
        let err = MercadoPagoLookup::new(MercadoPagoConfig::new(TOKEN).with_base_url("not a url"))
            .err()
            .unwrap();
        assert_eq!(err.code, LookupErrorCode::NetworkError);

        let err = MercadoPagoLookup::new(MercadoPagoConfig::new(TOKEN).with_base_url("mailto:x"))
            .err()
            .unwrap();
        assert_eq!(err.code, LookupErrorCode::NetworkError);
    }

    #[test]
    fn endpoint_escapes_resource_ids() {
        let lookup = lookup("https://api.mercadopago.com", TOKEN);

        let url = lookup
            .endpoint(&["v1", "payments"], "payment", "../../users/me?x=1#frag")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.mercadopago.com/v1/payments/..%2F..%2Fusers%2Fme%3Fx=1%23frag"
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let lookup = lookup("http://localhost:9000/mp/", TOKEN);

        let url = lookup
            .endpoint(&["merchant_orders"], "merchant_order", "42")
            .unwrap();

        assert_eq!(url.as_str(), "http://localhost:9000/mp/merchant_orders/42");
    }

    #[test]
    fn config_strips_trailing_slash() {
        let config = MercadoPagoConfig::new(TOKEN).with_base_url("http://localhost:9000/");
        assert_eq!(config.api_base_url(), "http://localhost:9000");
    }

    // ══════════════════════════════════════════════════════════════
    // Lookup Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn fetch_payment_maps_details() {
        let base_url = spawn_provider().await;

        let payment = lookup(&base_url, TOKEN).fetch_payment("123").await.unwrap();

        assert_eq!(payment.id, "123");
        assert_eq!(payment.status, PaymentStatus::Approved);
        assert_eq!(payment.external_reference.as_deref(), Some("REF_1"));
    }

    #[tokio::test]
    async fn fetch_payment_not_found() {
        let base_url = spawn_provider().await;

        let err = lookup(&base_url, TOKEN)
            .fetch_payment("missing")
            .await
            .unwrap_err();

        assert_eq!(err.code, LookupErrorCode::NotFound);
    }

    #[tokio::test]
    async fn path_traversal_id_stays_inside_payments() {
        let base_url = spawn_provider().await;

        let err = lookup(&base_url, TOKEN)
            .fetch_payment("../../users/me")
            .await
            .unwrap_err();

        assert_eq!(err.code, LookupErrorCode::NotFound);
    }

    #[tokio::test]
    async fn dot_segment_id_is_refused() {
        let base_url = spawn_provider().await;

        let err = lookup(&base_url, TOKEN)
            .fetch_merchant_order("..")
            .await
            .unwrap_err();

        assert_eq!(err.code, LookupErrorCode::NotFound);
    }

    #[tokio::test]
    async fn fetch_payment_with_bad_token() {
        let base_url = spawn_provider().await;

        let err = lookup(&base_url, "wrong").fetch_payment("123").await.unwrap_err();

        assert_eq!(err.code, LookupErrorCode::AuthenticationError);
    }

    #[tokio::test]
    async fn fetch_payment_upstream_error() {
        let base_url = spawn_provider().await;

        let err = lookup(&base_url, TOKEN).fetch_payment("boom").await.unwrap_err();

        assert_eq!(err.code, LookupErrorCode::ProviderError);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn fetch_payment_undecodable_body() {
        let base_url = spawn_provider().await;

        let err = lookup(&base_url, TOKEN)
            .fetch_payment("broken")
            .await
            .unwrap_err();

        assert_eq!(err.code, LookupErrorCode::DecodeError);
    }

    #[tokio::test]
    async fn fetch_merchant_order_maps_details() {
        let base_url = spawn_provider().await;

        let order = lookup(&base_url, TOKEN)
            .fetch_merchant_order("999")
            .await
            .unwrap();

        assert_eq!(order.id, "999");
        assert_eq!(order.status, "opened");
        assert_eq!(order.item_count, 1);
    }

    #[tokio::test]
    async fn unreachable_provider_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = lookup(&format!("http://{}", addr), TOKEN)
            .fetch_payment("123")
            .await
            .unwrap_err();

        assert_eq!(err.code, LookupErrorCode::NetworkError);
    }
}
