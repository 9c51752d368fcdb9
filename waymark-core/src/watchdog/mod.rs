//! Watchdog supervision
//!
//! The loop proves liveness by resetting the hardware watchdog once per
//! iteration. Unrecoverable faults stop the resets so the watchdog reboots
//! the device.

pub mod state;
pub mod supervisor;

pub use state::{FatalKind, SupervisorEvent, SupervisorState};
pub use supervisor::WatchdogSupervisor;
