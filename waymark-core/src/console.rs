//! Operator diagnostics channel
//!
//! Two kinds of output share the operator link:
//! - `info` lines, emitted only while debug mode is on
//! - `always` lines (boot banner, fatal reasons), emitted unconditionally
//!
//! Every line ends with CRLF. Write errors are dropped: the link has no
//! back-channel to report them on.

use core::fmt::{self, Write};

use waymark_hal::UartTx;
use waymark_protocol::LINE_ENDING;

/// Diagnostic console over an operator transmitter
pub struct Console<T: UartTx> {
    tx: T,
    debug: bool,
}

impl<T: UartTx> Console<T> {
    /// Create a console with the given initial debug state
    pub fn new(tx: T, debug: bool) -> Self {
        Self { tx, debug }
    }

    /// Check if gated output is enabled
    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    /// Enable or disable gated output
    pub fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
    }

    /// Emit a line only if debug mode is on
    pub fn info(&mut self, args: fmt::Arguments<'_>) {
        if self.debug {
            self.emit(args);
        }
    }

    /// Emit a line regardless of debug mode
    pub fn always(&mut self, args: fmt::Arguments<'_>) {
        self.emit(args);
    }

    /// Wait until everything emitted so far has left the transmitter
    pub fn flush(&mut self) {
        let _ = self.tx.flush();
    }

    /// Underlying transmitter
    pub fn tx(&self) -> &T {
        &self.tx
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        let mut writer = TxWriter(&mut self.tx);
        let _ = writer.write_fmt(args);
        let _ = writer.write_str(LINE_ENDING);
    }
}

struct TxWriter<'a, T: UartTx>(&'a mut T);

impl<T: UartTx> Write for TxWriter<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_blocking(s.as_bytes()).map_err(|_| fmt::Error)
    }
}
