//! Byte-fed line assembly
//!
//! Serial links and files both arrive as bytes; this turns them into text
//! lines one byte at a time so the caller decides how much to consume.
//!
//! - `\n` terminates a line
//! - `\r` is dropped wherever it appears
//! - a line longer than the capacity is reported once and skipped

use core::fmt;

use heapless::{String, Vec};

/// Errors that can occur while assembling a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded the assembler capacity; the rest of it is discarded
    Overflow,
    /// Completed line was not valid UTF-8
    InvalidUtf8,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineError::Overflow => f.write_str("line too long"),
            LineError::InvalidUtf8 => f.write_str("line is not valid UTF-8"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssembleState {
    /// Collecting bytes of the current line
    Collecting,
    /// Overflowed; dropping bytes until the next newline
    Discarding,
}

/// State machine turning a byte stream into lines of at most `N` bytes
#[derive(Debug, Clone)]
pub struct LineAssembler<const N: usize> {
    state: AssembleState,
    buffer: Vec<u8, N>,
}

impl<const N: usize> Default for LineAssembler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineAssembler<N> {
    /// Create a new, empty assembler
    pub const fn new() -> Self {
        Self {
            state: AssembleState::Collecting,
            buffer: Vec::new(),
        }
    }

    /// Reset the assembler state
    pub fn reset(&mut self) {
        self.state = AssembleState::Collecting;
        self.buffer.clear();
    }

    /// Check if a partial line is buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Feed a single byte to the assembler
    ///
    /// Returns `Ok(Some(line))` when a newline completes a line,
    /// `Ok(None)` when more bytes are needed, or `Err` if the line had to be
    /// dropped.
    pub fn feed(&mut self, byte: u8) -> Result<Option<String<N>>, LineError> {
        match (self.state, byte) {
            (_, b'\r') => Ok(None),
            (AssembleState::Discarding, b'\n') => {
                self.reset();
                Ok(None)
            }
            (AssembleState::Discarding, _) => Ok(None),
            (AssembleState::Collecting, b'\n') => self.finish().map(Some),
            (AssembleState::Collecting, _) => {
                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    self.state = AssembleState::Discarding;
                    return Err(LineError::Overflow);
                }
                Ok(None)
            }
        }
    }

    /// Take an unterminated tail, e.g. the last line of a file
    ///
    /// Returns `None` when nothing is buffered.
    pub fn take_partial(&mut self) -> Option<Result<String<N>, LineError>> {
        if self.state == AssembleState::Discarding {
            self.reset();
            return None;
        }
        if self.buffer.is_empty() {
            return None;
        }
        Some(self.finish())
    }

    fn finish(&mut self) -> Result<String<N>, LineError> {
        let bytes = core::mem::take(&mut self.buffer);
        self.state = AssembleState::Collecting;
        String::from_utf8(bytes).map_err(|_| LineError::InvalidUtf8)
    }
}
