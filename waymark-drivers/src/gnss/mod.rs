//! GNSS receiver drivers

pub mod decoder;

pub use decoder::NmeaFixSource;
