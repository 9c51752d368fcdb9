//! RP2040-specific HAL for the GNSS logger firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `waymark-hal` traits:
//!
//! - Buffered UART halves (operator link and receiver link)
//! - Status LED output
//! - Hardware watchdog
//! - Monotonic millisecond clock
//! - SD card over SPI with two-speed bring-up

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod sd;
pub mod uart;
pub mod watchdog;

pub use clock::MonotonicClock;
pub use gpio::StatusLed;
pub use sd::{probe as probe_sd_card, SdCardDevice, SdSpiDevice, SD_INIT_FREQ, SD_WORK_FREQ};
pub use uart::{SerialRx, SerialTx};
pub use watchdog::HardwareWatchdog;
