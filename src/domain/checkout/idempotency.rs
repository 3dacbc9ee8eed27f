//! Idempotency keys for checkout preference creation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique token attached to one logical creation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(Uuid);

impl IdempotencyKey {
    /// Creates a fresh random key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IdempotencyKey {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// One logical preference creation, possibly sent several times.
///
/// Every send of the same attempt carries the same key; a new attempt
/// always gets a new one.
#[derive(Debug, Clone)]
pub struct PreferenceAttempt {
    key: IdempotencyKey,
    sends: u32,
}

impl PreferenceAttempt {
    pub fn new() -> Self {
        Self {
            key: IdempotencyKey::generate(),
            sends: 1,
        }
    }

    pub fn idempotency_key(&self) -> IdempotencyKey {
        self.key
    }

    /// Records a retry and returns the key to resend with.
    pub fn retry(&mut self) -> IdempotencyKey {
        self.sends += 1;
        self.key
    }

    /// Number of times this attempt has been sent, including the first.
    pub fn sends(&self) -> u32 {
        self.sends
    }
}

impl Default for PreferenceAttempt {
    fn default() -> Self {
        Self::new()
    }
}
