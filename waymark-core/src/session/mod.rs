//! Logging session management
//!
//! The controller owns the single log session and serves every operator
//! command that touches storage or diagnostics.

pub mod browse;
pub mod controller;
pub mod reader;

pub use controller::LoggingController;
pub use reader::{FileReader, ReadProgress};
