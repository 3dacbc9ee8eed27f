//! Notification signature verification.
//!
//! The provider signs a manifest of the form
//! `id:<data.id>;request-id:<x-request-id>;ts:<ts>;` with HMAC-SHA256 and
//! sends `ts=<unix seconds>,v1=<hex digest>` in the `x-signature` header.
//! Timestamps more than five minutes away from now, in either direction,
//! are rejected to bound the replay window.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::VerificationError;
use super::payload::IncomingRequest;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying `ts` and `v1`.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Header carrying the provider's request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Maximum distance between the signature timestamp and now (5 minutes).
pub const MAX_SIGNATURE_SKEW_SECS: u64 = 300;

/// Parsed components of the `x-signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// `ts` exactly as sent; the manifest reuses it verbatim.
    pub raw_timestamp: String,
    /// `ts` as Unix seconds.
    pub timestamp: i64,
    /// `v1` hex digest as sent.
    pub v1: String,
}

impl SignatureHeader {
    /// Parses an `x-signature` header.
    ///
    /// Format: `ts=<timestamp>,v1=<hex>` in any order. Segments that are not
    /// exactly one `key=value` pair are skipped, unknown keys are ignored and
    /// a repeated key overrides the earlier value.
    ///
    /// # Errors
    ///
    /// Returns `VerificationError::MalformedSignature` if `ts` or `v1` is
    /// missing, or `ts` is not an integer.
    pub fn parse(header: &str) -> Result<Self, VerificationError> {
        let mut ts: Option<&str> = None;
        let mut v1: Option<&str> = None;

        for part in header.split(',') {
            let mut pieces = part.split('=');
            let (Some(key), Some(value), None) = (pieces.next(), pieces.next(), pieces.next())
            else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                continue;
            }

            match key {
                "ts" => ts = Some(value),
                "v1" => v1 = Some(value),
                _ => {}
            }
        }

        let (Some(ts), Some(v1)) = (ts, v1) else {
            return Err(VerificationError::MalformedSignature);
        };
        let timestamp = ts
            .parse::<i64>()
            .map_err(|_| VerificationError::MalformedSignature)?;

        Ok(SignatureHeader {
            raw_timestamp: ts.to_string(),
            timestamp,
            v1: v1.to_string(),
        })
    }
}

/// Per-request data needed to check a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationContext {
    pub request_id: String,
    /// Body `data.id`, or empty when absent.
    pub data_id: String,
    pub timestamp: i64,
    pub raw_timestamp: String,
    pub provided_hash: String,
}

impl VerificationContext {
    /// Extracts the verification inputs from a request.
    ///
    /// # Errors
    ///
    /// - `MissingHeaders` - `x-signature` or `x-request-id` is absent
    /// - `MalformedSignature` - `x-signature` cannot be parsed
    pub fn from_request(request: &IncomingRequest) -> Result<Self, VerificationError> {
        let (Some(signature), Some(request_id)) = (
            request.header(SIGNATURE_HEADER),
            request.header(REQUEST_ID_HEADER),
        ) else {
            return Err(VerificationError::MissingHeaders);
        };

        let header = SignatureHeader::parse(signature)?;

        Ok(VerificationContext {
            request_id: request_id.to_string(),
            data_id: request.data_id().unwrap_or_default(),
            timestamp: header.timestamp,
            raw_timestamp: header.raw_timestamp,
            provided_hash: header.v1,
        })
    }

    pub fn manifest(&self) -> String {
        build_manifest(&self.data_id, &self.request_id, &self.raw_timestamp)
    }

    /// Returns true if the timestamp is within the replay window of `now`.
    pub fn is_fresh(&self, now: i64) -> bool {
        now.abs_diff(self.timestamp) <= MAX_SIGNATURE_SKEW_SECS
    }
}

/// Builds the signed manifest. Field order and punctuation must match the
/// provider byte for byte.
pub fn build_manifest(data_id: &str, request_id: &str, ts: &str) -> String {
    format!("id:{};request-id:{};ts:{};", data_id, request_id, ts)
}

/// Computes the lowercase hex HMAC-SHA256 of `manifest`.
pub fn compute_signature(secret: &str, manifest: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(manifest.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies that a request is an authentic, fresh provider notification.
///
/// An absent or empty `secret` disables verification and always succeeds.
/// `now` is Unix seconds.
///
/// # Errors
///
/// - `MissingHeaders` - signature or request id header absent
/// - `MalformedSignature` - `ts` or `v1` missing or unusable
/// - `StaleTimestamp` - `|now - ts| > 300`
/// - `SignatureMismatch` - digest does not match `v1`
pub fn verify_signature(
    request: &IncomingRequest,
    secret: Option<&str>,
    now: i64,
) -> Result<(), VerificationError> {
    let secret = match secret {
        Some(secret) if !secret.is_empty() => secret,
        _ => return Ok(()),
    };

    let context = VerificationContext::from_request(request).map_err(|e| {
        tracing::warn!(reason = e.kind(), "Rejected notification signature");
        e
    })?;

    if !context.is_fresh(now) {
        tracing::warn!(
            reason = VerificationError::StaleTimestamp.kind(),
            request_id = %context.request_id,
            signature_timestamp = context.timestamp,
            current_time = now,
            "Signature timestamp outside replay window"
        );
        return Err(VerificationError::StaleTimestamp);
    }

    let expected = compute_signature(secret, &context.manifest());
    if !constant_time_compare(expected.as_bytes(), context.provided_hash.as_bytes()) {
        tracing::warn!(
            reason = VerificationError::SignatureMismatch.kind(),
            request_id = %context.request_id,
            data_id = %context.data_id,
            "Notification signature mismatch"
        );
        return Err(VerificationError::SignatureMismatch);
    }

    Ok(())
}

/// Holds the shared secret and applies the verification policy.
///
/// A verifier without a secret accepts every request. That mode exists for
/// local development only and offers no authenticity guarantee.
#[derive(Clone, Default)]
pub struct SignatureVerifier {
    secret: Option<SecretString>,
}

impl SignatureVerifier {
    /// Creates a verifier that checks signatures against `secret`.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(SecretString::new(secret.into())),
        }
    }

    /// Creates a verifier that accepts every request.
    pub fn disabled() -> Self {
        Self { secret: None }
    }

    pub fn from_secret(secret: Option<SecretString>) -> Self {
        Self { secret }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret
            .as_ref()
            .is_some_and(|s| !s.expose_secret().is_empty())
    }

    pub fn verify(&self, request: &IncomingRequest, now: i64) -> Result<(), VerificationError> {
        verify_signature(
            request,
            self.secret.as_ref().map(|s| s.expose_secret().as_str()),
            now,
        )
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
