//! Monotonic clock on the embassy time driver

use embassy_time::Instant;
use waymark_hal::Clock;

/// Milliseconds since boot
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
