//! Clock port - wall-clock time, injected so freshness checks are testable.

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current time as Unix seconds.
    fn now_unix(&self) -> i64;
}
