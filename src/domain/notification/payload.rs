//! Inbound notification payloads.
//!
//! Only the fields used for classification and routing are captured;
//! anything else the provider sends is ignored.

use http::HeaderMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::errors::WebhookError;

/// Inbound request as seen by the receiver core.
///
/// Header lookups are case-insensitive. The body is parsed once and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    headers: HeaderMap,
    body: Value,
}

impl IncomingRequest {
    pub fn new(headers: HeaderMap, body: Value) -> Self {
        Self { headers, body }
    }

    /// Parses a raw JSON body. An empty payload is read as `{}`.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MalformedBody` if the payload is not valid JSON.
    pub fn from_raw(headers: HeaderMap, payload: &[u8]) -> Result<Self, WebhookError> {
        if payload.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new(headers, Value::Object(Default::default())));
        }
        let body = serde_json::from_slice(payload)
            .map_err(|e| WebhookError::MalformedBody(e.to_string()))?;
        Ok(Self::new(headers, body))
    }

    /// Returns a header value if present and valid visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The body's `data.id`, in string form, if present and truthy.
    pub fn data_id(&self) -> Option<String> {
        self.body.get("data").and_then(resource_id)
    }

    /// Deserializes the body into a [`Notification`].
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MalformedBody` if the body is not a
    /// notification object.
    pub fn notification(&self) -> Result<Notification, WebhookError> {
        Notification::deserialize(&self.body)
            .map_err(|e| WebhookError::MalformedBody(e.to_string()))
    }
}

/// Notification payload sent by the payment provider.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Notification {
    /// Provider-side notification identifier (number or string).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Classification key; takes precedence over `type`.
    #[serde(
        default,
        deserialize_with = "loose_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub topic: Option<String>,

    /// Alias of `topic` used by newer notification formats.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "loose_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub notification_type: Option<String>,

    /// Action that triggered the notification (e.g. "payment.created").
    #[serde(
        default,
        deserialize_with = "loose_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub action: Option<String>,

    /// Resource reference, normally `{ "id": ... }`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Notification {
    /// Returns `topic`, falling back to `type`. Empty strings count as absent.
    pub fn classification_key(&self) -> Option<&str> {
        self.topic
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.notification_type.as_deref().filter(|t| !t.is_empty()))
    }

    /// Parses the classification key into a known topic.
    pub fn topic(&self) -> Option<Topic> {
        self.classification_key().map(Topic::from_key)
    }

    /// The referenced resource id, if present and truthy.
    pub fn data_id(&self) -> Option<String> {
        self.data.as_ref().and_then(resource_id)
    }
}

/// Topics the receiver routes on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topic {
    Payment,
    MerchantOrder,
    Other(String),
}

impl Topic {
    pub fn from_key(key: &str) -> Self {
        match key {
            "payment" => Self::Payment,
            "merchant_order" => Self::MerchantOrder,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Payment => "payment",
            Self::MerchantOrder => "merchant_order",
            Self::Other(raw) => raw,
        }
    }
}

/// Reads a string-ish field without rejecting the notification.
///
/// Falsy values (`null`, `false`, `0`) are absent; other non-strings keep
/// their JSON text, so `5` becomes `"5"`.
fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
        Some(other) => Some(other.to_string()),
    })
}

/// Extracts `id` from a `data` object.
///
/// Falsy ids (`""`, `0`, `false`, `null`) are treated as absent; numbers use
/// their decimal form so the manifest matches what the provider signed.
fn resource_id(data: &Value) -> Option<String> {
    match data.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Builder for test notifications.
#[cfg(test)]
#[derive(Default)]
pub struct NotificationBuilder {
    inner: Notification,
}

#[cfg(test)]
impl NotificationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.inner.topic = Some(topic.into());
        self
    }

    pub fn notification_type(mut self, notification_type: impl Into<String>) -> Self {
        self.inner.notification_type = Some(notification_type.into());
        self
    }

    pub fn data_id(mut self, id: Value) -> Self {
        self.inner.data = Some(serde_json::json!({ "id": id }));
        self
    }

    pub fn build(self) -> Notification {
        self.inner
    }
}
