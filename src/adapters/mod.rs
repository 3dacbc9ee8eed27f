//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `mercadopago` - Provider lookups (HTTP and mock)
//! - `sink` - Notification sinks (logging, in-memory)
//! - `clock` - System and fixed clocks
//! - `http` - Axum webhook endpoints

pub mod clock;
pub mod http;
pub mod mercadopago;
pub mod sink;
