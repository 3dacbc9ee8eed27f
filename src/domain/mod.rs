//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `notification` - Signature verification and notification dispatch
//! - `checkout` - Checkout preference idempotency

pub mod checkout;
pub mod notification;
