//! Notification module - verification and routing of provider callbacks.
//!
//! Control flow: inbound request → [`SignatureVerifier`] (reject or pass) →
//! [`NotificationDispatcher`] (classify, enrich) → business layer.

mod dispatcher;
mod errors;
mod outcome;
mod payload;
mod signature;

pub use dispatcher::{DispatchResult, NotificationDispatcher};
pub use errors::{VerificationError, WebhookError};
pub use outcome::{MerchantOrderDetails, NotificationOutcome, PaymentDetails, PaymentStatus};
pub use payload::{IncomingRequest, Notification, Topic};
pub use signature::{
    build_manifest, compute_signature, verify_signature, SignatureHeader, SignatureVerifier,
    VerificationContext, MAX_SIGNATURE_SKEW_SECS, REQUEST_ID_HEADER, SIGNATURE_HEADER,
};
