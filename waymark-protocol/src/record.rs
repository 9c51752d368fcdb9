//! CSV log record format
//!
//! Every log file starts with [`CSV_HEADER`] (written only when the file is
//! created) followed by one row per accepted fix:
//! ```text
//! YYYY-MM-DD HH:MM:SS,<lat>,<lon>
//! ```
//! Coordinates are decimal degrees with exactly six fractional digits.

use core::fmt::{self, Write};

use heapless::String;

/// First row of every log file
pub const CSV_HEADER: &str = "Timestamp,Lat,Lon";

/// Row terminator used in log files
pub const LINE_ENDING: &str = "\r\n";

/// Maximum formatted row length, terminator excluded
///
/// A worst-case sane row (`-90.000000`, `-180.000000`) is 42 bytes.
pub const MAX_RECORD_LEN: usize = 64;

/// Errors that can occur when formatting a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Formatted row does not fit in [`MAX_RECORD_LEN`]
    TooLong,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::TooLong => f.write_str("record too long"),
        }
    }
}

/// UTC date and time of a fix, to the second
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// One CSV row
///
/// Created once per accepted fix, written once, never modified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRecord {
    pub timestamp: Timestamp,
    /// Latitude in decimal degrees, north positive
    pub latitude: f64,
    /// Longitude in decimal degrees, east positive
    pub longitude: f64,
}

impl LogRecord {
    /// Format the row without its terminator
    pub fn to_line(&self) -> Result<String<MAX_RECORD_LEN>, RecordError> {
        let mut line = String::new();
        write!(line, "{}", self).map_err(|_| RecordError::TooLong)?;
        Ok(line)
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{:.6},{:.6}", self.timestamp, self.latitude, self.longitude)
    }
}
