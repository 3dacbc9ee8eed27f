//! Checkout module - support types for the checkout-creation path.
//!
//! Creating checkout preferences is handled elsewhere; this module only owns
//! the idempotency policy so retries never open duplicate sessions upstream.

mod idempotency;

pub use idempotency::{IdempotencyKey, PreferenceAttempt};
