//! Waymark Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs (RP2040 today). The logging core only ever talks
//! to these traits, so the same application code runs on the board and in
//! host-side tests against mock collaborators.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (waymark-firmware)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  waymark-core (logging, dispatch, loop) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  waymark-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ waymark-hal-  │       │ waymark-      │
//! │    rp2040     │       │   drivers     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`gpio::OutputPin`] - Status indicator
//! - [`storage::FileStorage`] - Named files on removable media
//! - [`watchdog::WatchdogTimer`] - Hardware liveness timer
//! - [`clock::Clock`] - Monotonic time since boot

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod storage;
pub mod uart;
pub mod watchdog;

// Re-export key traits at crate root for convenience
pub use clock::Clock;
pub use gpio::OutputPin;
pub use storage::{FileStorage, OpenMode, StorageError};
pub use uart::{SerialError, UartRx, UartTx};
pub use watchdog::WatchdogTimer;
