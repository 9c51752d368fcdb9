//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in waymark-hal and waymark-core:
//!
//! - FAT file storage on SD cards (embedded-sdmmc)
//! - NMEA 0183 fix decoding (RMC and GGA sentences)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod gnss;
pub mod storage;
