//! Configuration types
//!
//! Board-agnostic logger settings, loaded from a TOML document embedded in
//! the firmware image.

pub mod toml;
pub mod types;

pub use toml::{parse_config, ConfigError};
pub use types::*;
