//! Board binding and shared loop context

use waymark_hal::{Clock, FileStorage, OutputPin, UartRx, UartTx, WatchdogTimer};

use crate::console::Console;
use crate::traits::FixSource;

/// Set of peripheral types a board provides
pub trait Board {
    type Storage: FileStorage;
    type Fix: FixSource;
    /// Operator link, transmit half
    type Console: UartTx;
    /// Operator link, receive half
    type Commands: UartRx;
    /// Receiver link, receive half
    type Gnss: UartRx;
    type Led: OutputPin;
    type Clock: Clock;
    type Watchdog: WatchdogTimer;
}

/// Open file handle type of a board's storage
pub type FileHandle<B> = <<B as Board>::Storage as FileStorage>::Handle;

/// Peripherals shared by the command handlers and the record path
pub struct Context<B: Board> {
    pub storage: B::Storage,
    pub fix: B::Fix,
    pub console: Console<B::Console>,
    pub status_led: B::Led,
    pub clock: B::Clock,
}
