//! Hardware watchdog

use embassy_rp::watchdog::Watchdog;
use embassy_time::Duration;
use waymark_hal::WatchdogTimer;

/// RP2040 watchdog; the counter tops out at about 8.3 s
pub struct HardwareWatchdog {
    inner: Watchdog,
}

impl HardwareWatchdog {
    pub fn new(inner: Watchdog) -> Self {
        Self { inner }
    }
}

impl WatchdogTimer for HardwareWatchdog {
    fn start(&mut self, timeout_ms: u32) {
        self.inner.start(Duration::from_millis(u64::from(timeout_ms)));
    }

    fn feed(&mut self) {
        self.inner.feed();
    }

    fn park(&mut self) {
        cortex_m::asm::wfi();
    }
}
