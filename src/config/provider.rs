//! Payment provider configuration (Mercado Pago)

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Account access token for the read API
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// Shared secret used to sign notifications
    #[serde(default)]
    pub webhook_secret: Option<SecretString>,

    /// API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Lookup timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// The webhook secret, if set and non-empty.
    pub fn webhook_secret(&self) -> Option<&SecretString> {
        self.webhook_secret
            .as_ref()
            .filter(|s| !s.expose_secret().is_empty())
    }

    /// The access token, if set and non-empty.
    pub fn access_token(&self) -> Option<&SecretString> {
        self.access_token
            .as_ref()
            .filter(|s| !s.expose_secret().is_empty())
    }

    /// Validate provider configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if !self.api_base_url.starts_with("https://") && !self.api_base_url.starts_with("http://")
        {
            return Err(ValidationError::InvalidProviderUrl);
        }
        if production && !self.api_base_url.starts_with("https://") {
            return Err(ValidationError::ProviderUrlMustBeHttps);
        }
        if self.request_timeout_ms == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if production && self.access_token().is_none() {
            return Err(ValidationError::MissingRequired("PROVIDER__ACCESS_TOKEN"));
        }
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            webhook_secret: None,
            api_base_url: default_api_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.mercadopago.com".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5_000
}
