//! SD card on a blocking SPI bus
//!
//! Cards must be identified at no more than 400 kHz. Once the card has
//! answered, the bus is raised to working speed.

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::SdCard;

/// Identification clock
pub const SD_INIT_FREQ: u32 = 400_000;

/// Working clock after the card has answered
pub const SD_WORK_FREQ: u32 = 16_000_000;

/// SPI device with its own chip-select line
pub type SdSpiDevice<'d> = ExclusiveDevice<Spi<'d, SPI1, Blocking>, Output<'d>, Delay>;

/// Card driver over that device
pub type SdCardDevice<'d> = SdCard<SdSpiDevice<'d>, Delay>;

/// Bring the card up and switch to working speed
///
/// Returns `false` when the card does not answer.
pub fn probe(card: &SdCardDevice<'_>) -> bool {
    match card.num_bytes() {
        Ok(_bytes) => {
            #[cfg(feature = "defmt")]
            defmt::info!("sd card answered, {} bytes", _bytes);
            card.spi(|dev| dev.bus_mut().set_frequency(SD_WORK_FREQ));
            true
        }
        Err(_e) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("sd card not answering: {}", defmt::Debug2Format(&_e));
            false
        }
    }
}
