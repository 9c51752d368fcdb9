//! Raspberry Pi Pico wiring
//!
//! | Function        | Peripheral | Pins                                 |
//! |-----------------|------------|--------------------------------------|
//! | Operator link   | UART0      | TX GPIO0, RX GPIO1                   |
//! | Receiver link   | UART1      | TX GPIO4, RX GPIO5                   |
//! | SD card         | SPI1       | CLK GPIO10, MOSI GPIO11, MISO GPIO12 |
//! | SD chip select  | GPIO       | GPIO13                               |
//! | Status LED      | GPIO       | GPIO25                               |

use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use embassy_rp::watchdog::Watchdog;
use embassy_rp::Peripherals;
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::SdCard;
use static_cell::StaticCell;

use waymark_core::config::LoggerConfig;
use waymark_core::{Board, Parts};
use waymark_drivers::gnss::NmeaFixSource;
use waymark_drivers::storage::{FixedTimeSource, SdmmcStorage};
use waymark_hal_rp2040::{
    probe_sd_card, HardwareWatchdog, MonotonicClock, SdCardDevice, SerialRx, SerialTx, StatusLed,
    SD_INIT_FREQ,
};

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

/// Operator transmit queue
const CONSOLE_TX_BUF: usize = 256;
/// Operator receive queue, several commands deep
const CONSOLE_RX_BUF: usize = 256;
/// Receiver link transmit queue, unused but required by the driver
const GNSS_TX_BUF: usize = 16;
/// Receiver link receive queue, matches the per-iteration drain
const GNSS_RX_BUF: usize = 256;

/// Card bring-up hook handed to the storage driver
pub type SdProbe = fn(&SdCardDevice<'static>) -> bool;

/// Raspberry Pi Pico with SD breakout and serial GNSS receiver
pub struct Pico;

impl Board for Pico {
    type Storage = SdmmcStorage<SdCardDevice<'static>, FixedTimeSource, SdProbe>;
    type Fix = NmeaFixSource;
    type Console = SerialTx;
    type Commands = SerialRx;
    type Gnss = SerialRx;
    type Led = StatusLed<'static>;
    type Clock = MonotonicClock;
    type Watchdog = HardwareWatchdog;
}

/// Configure every peripheral the logger uses
///
/// Nothing here talks to the SD card yet; that happens at boot.
pub fn bring_up(p: Peripherals, config: &LoggerConfig) -> Parts<Pico> {
    static CONSOLE_TX: StaticCell<[u8; CONSOLE_TX_BUF]> = StaticCell::new();
    static CONSOLE_RX: StaticCell<[u8; CONSOLE_RX_BUF]> = StaticCell::new();
    let console_tx_buf = &mut CONSOLE_TX.init([0; CONSOLE_TX_BUF])[..];
    let console_rx_buf = &mut CONSOLE_RX.init([0; CONSOLE_RX_BUF])[..];

    let mut console_config = UartConfig::default();
    console_config.baudrate = config.command_baud;
    let console = BufferedUart::new(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        Irqs,
        console_tx_buf,
        console_rx_buf,
        console_config,
    );
    let (console_tx, console_rx) = console.split();

    static GNSS_TX: StaticCell<[u8; GNSS_TX_BUF]> = StaticCell::new();
    static GNSS_RX: StaticCell<[u8; GNSS_RX_BUF]> = StaticCell::new();
    let gnss_tx_buf = &mut GNSS_TX.init([0; GNSS_TX_BUF])[..];
    let gnss_rx_buf = &mut GNSS_RX.init([0; GNSS_RX_BUF])[..];

    let mut gnss_config = UartConfig::default();
    gnss_config.baudrate = config.gnss_baud;
    let gnss = BufferedUart::new(
        p.UART1,
        p.PIN_4,
        p.PIN_5,
        Irqs,
        gnss_tx_buf,
        gnss_rx_buf,
        gnss_config,
    );
    let (_gnss_tx, gnss_rx) = gnss.split();

    let mut spi_config = spi::Config::default();
    spi_config.frequency = SD_INIT_FREQ;
    let spi = Spi::new_blocking(p.SPI1, p.PIN_10, p.PIN_11, p.PIN_12, spi_config);
    let cs = Output::new(p.PIN_13, Level::High);
    let spi_device = match ExclusiveDevice::new(spi, cs, Delay) {
        Ok(device) => device,
        Err(never) => match never {},
    };
    let card = SdCard::new(spi_device, Delay);

    Parts {
        storage: SdmmcStorage::new(card, FixedTimeSource, probe_sd_card as SdProbe),
        fix: NmeaFixSource::new(),
        console: SerialTx::new(console_tx),
        commands: SerialRx::new(console_rx),
        gnss: SerialRx::new(gnss_rx),
        status_led: StatusLed::new(Output::new(p.PIN_25, Level::Low)),
        clock: MonotonicClock,
        watchdog: HardwareWatchdog::new(Watchdog::new(p.WATCHDOG)),
    }
}
