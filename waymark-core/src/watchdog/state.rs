//! Supervisor state machine

use core::fmt;

/// Unrecoverable faults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FatalKind {
    /// Storage medium failed to initialise at boot
    StorageInit,
    /// Log file could not be opened for appending
    LogFileOpen,
}

impl FatalKind {
    /// Reason emitted to the operator before halting
    pub fn message(&self) -> &'static str {
        match self {
            FatalKind::StorageInit => {
                "SD card initialization failed! Check wiring and card insertion."
            }
            FatalKind::LogFileOpen => "Error opening log file for writing.",
        }
    }
}

impl fmt::Display for FatalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Supervisor states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SupervisorState {
    /// Power-on; the hardware watchdog is not running yet
    Disarmed,
    /// Watchdog running and reset every iteration
    Running,
    /// Fault raised; resets have stopped for good
    Fatal(FatalKind),
}

/// Supervisor events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SupervisorEvent {
    /// Hardware watchdog started
    Armed,
    /// Unrecoverable fault detected
    FatalRaised(FatalKind),
}

impl SupervisorState {
    /// Check if this state resets the hardware watchdog
    pub fn feeds_watchdog(&self) -> bool {
        matches!(self, SupervisorState::Running)
    }

    /// Check if this is the fatal state
    pub fn is_fatal(&self) -> bool {
        matches!(self, SupervisorState::Fatal(_))
    }

    /// Process an event and return the next state
    ///
    /// `Fatal` is terminal: only a hardware reset leaves it.
    pub fn transition(self, event: SupervisorEvent) -> Self {
        use SupervisorEvent::*;
        use SupervisorState::*;

        match (self, event) {
            (Fatal(kind), _) => Fatal(kind),
            (Disarmed, Armed) | (Running, Armed) => Running,
            (_, FatalRaised(kind)) => Fatal(kind),
        }
    }
}
