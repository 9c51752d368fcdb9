//! File storage drivers

pub mod sdmmc;

pub use sdmmc::{FixedTimeSource, SdmmcStorage};
