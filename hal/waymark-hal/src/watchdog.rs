//! Watchdog timer abstraction
//!
//! Once started, the timer resets the whole chip unless it is fed again
//! within the configured timeout. There is no way to stop it.

/// Hardware watchdog
pub trait WatchdogTimer {
    /// Start the countdown with the given timeout
    fn start(&mut self, timeout_ms: u32);

    /// Restart the countdown
    fn feed(&mut self);

    /// Idle for a short while without feeding
    ///
    /// Called in a loop while waiting for the timer to expire.
    fn park(&mut self) {
        core::hint::spin_loop();
    }
}
