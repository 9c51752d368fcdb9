//! Waymark - GNSS Track Logger Firmware
//!
//! Main firmware binary for RP2040-based track loggers. Reads NMEA from a
//! serial GNSS receiver and appends a timestamped coordinate row to a CSV
//! file on the SD card whenever a fresh fix is available. An operator on
//! the USB-serial link can start, stop, list, read and delete log files.
//!
//! Named after the trail markers left along a route so it can be
//! followed later.

#![no_std]
#![no_main]

mod board;

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_rp::clocks::RoscRng;
use rand_core::RngCore;
use {defmt_rtt as _, panic_probe as _};

use waymark_core::config::{parse_config, LoggerConfig};
use waymark_core::Runtime;

use crate::board::Pico;

/// Logger settings embedded at build time
const LOGGER_TOML: &str = include_str!("../logger.toml");

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Waymark starting...");

    let p = embassy_rp::init(Default::default());
    let config = load_config();
    info!("config: {}", config);

    let parts = board::bring_up(p, &config);
    let mut runtime = Runtime::<Pico>::new(parts, &config);

    // Ring-oscillator jitter picks the session file
    let session_number = RoscRng.next_u32();
    if let Err(kind) = runtime.boot(session_number) {
        error!("boot failed: {}", kind);
        runtime.halt_fatal(kind);
    }
    info!("logger running");

    loop {
        if let Err(kind) = runtime.poll_once() {
            error!("fatal: {}", kind);
            runtime.halt_fatal(kind);
        }
        yield_now().await;
    }
}

/// Parse the embedded settings, falling back to defaults
fn load_config() -> LoggerConfig {
    match parse_config(LOGGER_TOML) {
        Ok(config) => config,
        Err(e) => {
            warn!("logger.toml rejected ({}), using defaults", e);
            LoggerConfig::default()
        }
    }
}
