//! Mercado Pago provider adapter.
//!
//! Implements the `ProviderLookup` port for Mercado Pago, including:
//! - Payment lookups (`/v1/payments/{id}`)
//! - Merchant order lookups (`/merchant_orders/{id}`)
//!
//! # Configuration
//!
//! Required environment variables:
//! - `CHECKOUT_WEBHOOKS__PROVIDER__ACCESS_TOKEN`: account access token

mod lookup;
mod mock_lookup;
mod types;

pub use lookup::{MercadoPagoConfig, MercadoPagoLookup, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT};
pub use mock_lookup::MockProviderLookup;
pub use types::{MercadoPagoMerchantOrder, MercadoPagoPayment};
