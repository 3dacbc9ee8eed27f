//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ProviderLookup` - Payment provider read API
//! - `NotificationSink` - Business layer receiving classified outcomes
//! - `Clock` - Wall-clock time

mod clock;
mod notification_sink;
mod provider_lookup;

pub use clock::Clock;
pub use notification_sink::{NotificationSink, SinkError};
pub use provider_lookup::{LookupError, LookupErrorCode, ProviderLookup};
