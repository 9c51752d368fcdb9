//! Positioning fix model and source trait

use waymark_protocol::{LogRecord, Timestamp};

/// Horizontal position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Location {
    /// North positive
    pub latitude: f64,
    /// East positive
    pub longitude: f64,
}

/// UTC calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// UTC time of day, whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Snapshot of the most recent fix
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fix {
    /// Present once the receiver has reported a valid position
    pub location: Option<Location>,
    pub date: Option<Date>,
    pub time: Option<Time>,
    /// Milliseconds since `location` was last updated, `u32::MAX` if never
    pub age_ms: u32,
}

impl Default for Fix {
    fn default() -> Self {
        Self::none()
    }
}

impl Fix {
    /// A fix with nothing known
    pub const fn none() -> Self {
        Self {
            location: None,
            date: None,
            time: None,
            age_ms: u32::MAX,
        }
    }

    /// Check if a valid position is known
    pub fn is_valid(&self) -> bool {
        self.location.is_some()
    }

    /// Combined date and time, if both are known
    pub fn timestamp(&self) -> Option<Timestamp> {
        let date = self.date?;
        let time = self.time?;
        Some(Timestamp {
            year: date.year,
            month: date.month,
            day: date.day,
            hour: time.hour,
            minute: time.minute,
            second: time.second,
        })
    }

    /// Build a log row if the fix is valid and younger than `max_age_ms`
    pub fn fresh_record(&self, max_age_ms: u32) -> Option<LogRecord> {
        if self.age_ms >= max_age_ms {
            return None;
        }
        let location = self.location?;
        Some(LogRecord {
            timestamp: self.timestamp()?,
            latitude: location.latitude,
            longitude: location.longitude,
        })
    }
}

/// Incremental decoder for the receiver byte stream
///
/// Implementations consume raw bytes one at a time and keep the latest
/// decoded fix. Feeding a byte never blocks.
pub trait FixSource {
    /// Feed one received byte, `now_ms` being the current monotonic time
    fn encode(&mut self, byte: u8, now_ms: u64);

    /// Current fix as seen at `now_ms`
    fn fix(&self, now_ms: u64) -> Fix;
}
