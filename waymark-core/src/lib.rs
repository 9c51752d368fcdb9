//! Board-agnostic core logic for the GNSS logger firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Positioning fix model and the `FixSource` trait
//! - Logging session state machine (START/STOP/DELETE and interval-gated recording)
//! - Operator command dispatch
//! - Watchdog supervision and the fatal-halt path
//! - The cooperative supervisor loop tying it all together
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod console;
pub mod context;
pub mod dispatch;
pub mod runtime;
pub mod session;
pub mod traits;
pub mod watchdog;

#[cfg(test)]
mod testing;

pub use context::{Board, Context};
pub use runtime::{Parts, Runtime};
pub use watchdog::FatalKind;
