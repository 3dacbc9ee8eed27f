//! Notification sink adapters.
//!
//! - `LoggingNotificationSink` - default sink, logs each outcome
//! - `InMemoryNotificationSink` - captures outcomes for tests

mod in_memory;
mod logging;

pub use in_memory::InMemoryNotificationSink;
pub use logging::LoggingNotificationSink;
