//! Buffered UART halves
//!
//! Both links run on interrupt-driven ring buffers. Reads only ever take
//! what the interrupt handler has already queued.

use embassy_rp::uart::{BufferedUartRx, BufferedUartTx, Error};
use embedded_io::{Read, ReadReady, Write};
use waymark_hal::{SerialError, UartRx, UartTx};

fn map_error(error: Error) -> SerialError {
    match error {
        Error::Overrun => SerialError::Overrun,
        Error::Break => SerialError::Break,
        Error::Framing | Error::Parity => SerialError::Framing,
        #[allow(unreachable_patterns)]
        _ => SerialError::Other,
    }
}

/// Transmit half
pub struct SerialTx {
    inner: BufferedUartTx,
}

impl SerialTx {
    pub fn new(inner: BufferedUartTx) -> Self {
        Self { inner }
    }
}

impl UartTx for SerialTx {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), SerialError> {
        self.inner.write_all(data).map_err(map_error)
    }

    fn flush(&mut self) -> Result<(), SerialError> {
        Write::flush(&mut self.inner).map_err(map_error)
    }
}

/// Receive half
pub struct SerialRx {
    inner: BufferedUartRx,
}

impl SerialRx {
    pub fn new(inner: BufferedUartRx) -> Self {
        Self { inner }
    }
}

impl UartRx for SerialRx {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        if buf.is_empty() || !self.inner.read_ready().map_err(map_error)? {
            return Ok(0);
        }
        self.inner.read(buf).map_err(map_error)
    }
}
