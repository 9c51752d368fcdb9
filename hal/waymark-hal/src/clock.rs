//! Monotonic time source

/// Milliseconds since boot
///
/// Must never go backwards.
pub trait Clock {
    /// Current uptime in milliseconds
    fn now_ms(&self) -> u64;
}
