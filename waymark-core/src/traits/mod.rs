//! Positioning abstraction traits
//!
//! These traits define the interface between the application logic
//! and the receiver-specific sentence decoders.

pub mod fix;

pub use fix::{Date, Fix, FixSource, Location, Time};
