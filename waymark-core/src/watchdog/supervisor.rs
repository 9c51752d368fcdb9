//! Hardware watchdog supervisor

use waymark_hal::{UartTx, WatchdogTimer};

use super::state::{FatalKind, SupervisorEvent, SupervisorState};
use crate::console::Console;

/// Owns the hardware watchdog and decides when it is reset
pub struct WatchdogSupervisor<W: WatchdogTimer> {
    timer: W,
    state: SupervisorState,
    timeout_ms: u32,
}

impl<W: WatchdogTimer> WatchdogSupervisor<W> {
    /// Create a disarmed supervisor
    pub fn new(timer: W, timeout_ms: u32) -> Self {
        Self {
            timer,
            state: SupervisorState::Disarmed,
            timeout_ms,
        }
    }

    /// Current state
    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Start the hardware watchdog
    ///
    /// Arming an already running watchdog has no effect.
    pub fn arm(&mut self) {
        if self.state == SupervisorState::Disarmed {
            self.timer.start(self.timeout_ms);
        }
        self.state = self.state.transition(SupervisorEvent::Armed);
    }

    /// Reset the watchdog countdown; only effective while running
    pub fn reset(&mut self) {
        if self.state.feeds_watchdog() {
            self.timer.feed();
        }
    }

    /// Record a fatal fault and emit its reason
    ///
    /// Starts the watchdog if it was never armed so the device still
    /// reboots. After this, `reset` never feeds again.
    pub fn enter_fatal<T: UartTx>(&mut self, kind: FatalKind, console: &mut Console<T>) {
        if self.state == SupervisorState::Disarmed {
            self.timer.start(self.timeout_ms);
        }
        self.state = self.state.transition(SupervisorEvent::FatalRaised(kind));

        #[cfg(feature = "defmt")]
        defmt::error!("fatal: {}", kind);

        console.always(format_args!("{}", kind.message()));
        console.flush();
    }

    /// Emit the fault reason and wait for the watchdog to reboot the device
    pub fn halt_fatal<T: UartTx>(&mut self, kind: FatalKind, console: &mut Console<T>) -> ! {
        self.enter_fatal(kind, console);
        loop {
            self.timer.park();
        }
    }

    /// Underlying timer
    pub fn timer(&self) -> &W {
        &self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingWatchdog, SerialLog};

    fn supervisor() -> WatchdogSupervisor<CountingWatchdog> {
        WatchdogSupervisor::new(CountingWatchdog::default(), 8000)
    }

    #[test]
    fn test_reset_before_arm_does_nothing() {
        let mut sup = supervisor();
        sup.reset();
        assert_eq!(sup.timer().feeds, 0);
        assert_eq!(sup.timer().started, None);
    }

    #[test]
    fn test_arm_starts_once() {
        let mut sup = supervisor();
        sup.arm();
        sup.arm();
        assert_eq!(sup.timer().started, Some(8000));
        assert_eq!(sup.timer().starts, 1);
        assert_eq!(sup.state(), SupervisorState::Running);
    }

    #[test]
    fn test_reset_feeds_while_running() {
        let mut sup = supervisor();
        sup.arm();
        sup.reset();
        sup.reset();
        assert_eq!(sup.timer().feeds, 2);
    }

    #[test]
    fn test_fatal_stops_feeding_and_reports() {
        let mut sup = supervisor();
        let mut console = Console::new(SerialLog::default(), false);
        sup.arm();
        sup.enter_fatal(FatalKind::LogFileOpen, &mut console);
        sup.reset();
        assert_eq!(sup.timer().feeds, 0);
        assert_eq!(console.tx().lines(), ["Error opening log file for writing."]);
        assert!(console.tx().flushed);
    }

    #[test]
    fn test_fatal_before_arm_starts_watchdog() {
        let mut sup = supervisor();
        let mut console = Console::new(SerialLog::default(), false);
        sup.enter_fatal(FatalKind::StorageInit, &mut console);
        assert_eq!(sup.timer().started, Some(8000));
        assert_eq!(sup.state(), SupervisorState::Fatal(FatalKind::StorageInit));
    }

    #[test]
    #[should_panic(expected = "parked")]
    fn test_halt_never_returns() {
        let mut sup = supervisor();
        let mut console = Console::new(SerialLog::default(), false);
        sup.arm();
        sup.halt_fatal(FatalKind::LogFileOpen, &mut console);
    }
}
