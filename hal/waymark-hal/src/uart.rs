//! UART serial communication abstractions
//!
//! The logger never waits on a serial port: transmit is allowed to block
//! until the bytes are queued, but receive only ever hands back what is
//! already sitting in the driver's buffer.

use core::fmt;

/// Errors reported by serial adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError {
    /// Receiver overrun, bytes were lost
    Overrun,
    /// Framing or parity error on the line
    Framing,
    /// Break condition detected
    Break,
    /// Any other peripheral fault
    Other,
}

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialError::Overrun => f.write_str("receiver overrun"),
            SerialError::Framing => f.write_str("framing error"),
            SerialError::Break => f.write_str("break condition"),
            SerialError::Other => f.write_str("serial fault"),
        }
    }
}

/// UART transmitter
pub trait UartTx {
    /// Write data to the UART
    ///
    /// Blocks until all data has been queued or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), SerialError>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), SerialError>;
}

/// UART receiver
///
/// Non-blocking: implementations must never wait for bytes to arrive.
pub trait UartRx {
    /// Copy already-received bytes into `buf`
    ///
    /// Returns the number of bytes copied, `0` when nothing is buffered.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, SerialError>;

    /// Read a single buffered byte, if there is one
    fn try_read_byte(&mut self) -> Result<Option<u8>, SerialError> {
        let mut buf = [0u8; 1];
        match self.read_available(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }
}
