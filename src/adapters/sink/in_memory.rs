//! In-memory sink for testing.
//!
//! Captures every delivered outcome and can be switched to fail, so callers
//! can assert on what reached the business layer.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::notification::NotificationOutcome;
use crate::ports::{NotificationSink, SinkError};

/// Sink that stores outcomes in memory.
#[derive(Clone, Default)]
pub struct InMemoryNotificationSink {
    inner: Arc<Mutex<SinkState>>,
}

#[derive(Default)]
struct SinkState {
    outcomes: Vec<NotificationOutcome>,
    error: Option<SinkError>,
}

impl InMemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects every delivery with `error`.
    pub fn failing_with(error: SinkError) -> Self {
        let sink = Self::new();
        sink.inner.lock().unwrap().error = Some(error);
        sink
    }

    /// Outcomes delivered so far, in order.
    pub fn outcomes(&self) -> Vec<NotificationOutcome> {
        self.inner.lock().unwrap().outcomes.clone()
    }

    pub fn delivered_count(&self) -> usize {
        self.inner.lock().unwrap().outcomes.len()
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationSink {
    async fn deliver(&self, outcome: &NotificationOutcome) -> Result<(), SinkError> {
        let mut state = self.inner.lock().unwrap();
        if let Some(error) = state.error.clone() {
            return Err(error);
        }
        state.outcomes.push(outcome.clone());
        Ok(())
    }
}
