//! Checkout Webhooks - payment notification receiver for Mercado Pago.
//!
//! Verifies signed provider notifications, classifies them by topic and
//! fetches the referenced payment or merchant order before handing the
//! outcome to the business layer.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
