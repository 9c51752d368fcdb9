//! NMEA 0183 fix decoder
//!
//! Assembles receiver bytes into sentences and keeps the latest position,
//! date and time from RMC and GGA. Other sentence types are ignored.
//!
//! Once a position has been reported it stays known; only its age grows
//! when the receiver loses the fix.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use nmea::sentences::rmc::RmcStatusOfFix;
use nmea::sentences::FixType;
use nmea::ParseResult;
use waymark_core::traits::{Date, Fix, FixSource, Location, Time};
use waymark_protocol::LineAssembler;

/// Longest sentence accepted, terminator excluded
///
/// The standard caps sentences at 82 characters; some receivers exceed it.
pub const MAX_SENTENCE_LEN: usize = 120;

/// Decoder counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderStats {
    /// Sentences that updated the fix
    pub accepted: u32,
    /// RMC/GGA-shaped input that failed to parse or checksum
    pub rejected: u32,
}

/// Fix source fed from an NMEA byte stream
pub struct NmeaFixSource {
    assembler: LineAssembler<MAX_SENTENCE_LEN>,
    location: Option<Location>,
    location_at_ms: u64,
    date: Option<Date>,
    time: Option<Time>,
    stats: DecoderStats,
}

impl Default for NmeaFixSource {
    fn default() -> Self {
        Self::new()
    }
}

impl NmeaFixSource {
    pub const fn new() -> Self {
        Self {
            assembler: LineAssembler::new(),
            location: None,
            location_at_ms: 0,
            date: None,
            time: None,
            stats: DecoderStats {
                accepted: 0,
                rejected: 0,
            },
        }
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    fn apply_sentence(&mut self, sentence: &str, now_ms: u64) {
        if !sentence.starts_with('$') {
            return;
        }

        match nmea::parse_str(sentence) {
            Ok(ParseResult::RMC(rmc)) => {
                if rmc.status_of_fix != RmcStatusOfFix::Invalid {
                    self.update_location(rmc.lat, rmc.lon, now_ms);
                }
                self.update_time(rmc.fix_time);
                if let Some(date) = rmc.fix_date.and_then(to_date) {
                    self.date = Some(date);
                }
                self.stats.accepted += 1;
            }
            Ok(ParseResult::GGA(gga)) => {
                if gga.fix_type.is_some_and(|t| t != FixType::Invalid) {
                    self.update_location(gga.latitude, gga.longitude, now_ms);
                }
                self.update_time(gga.fix_time);
                self.stats.accepted += 1;
            }
            // Sentence types this build does not decode
            Ok(_) | Err(nmea::Error::DisabledSentence) | Err(nmea::Error::Unsupported(_)) => {}
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("nmea rejected: {}", defmt::Debug2Format(&_e));
                self.stats.rejected += 1;
            }
        }
    }

    fn update_location(&mut self, latitude: Option<f64>, longitude: Option<f64>, now_ms: u64) {
        if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
            self.location = Some(Location {
                latitude,
                longitude,
            });
            self.location_at_ms = now_ms;
        }
    }

    fn update_time(&mut self, time: Option<NaiveTime>) {
        if let Some(time) = time.and_then(to_time) {
            self.time = Some(time);
        }
    }
}

impl FixSource for NmeaFixSource {
    fn encode(&mut self, byte: u8, now_ms: u64) {
        match self.assembler.feed(byte) {
            Ok(Some(sentence)) => self.apply_sentence(sentence.as_str(), now_ms),
            Ok(None) => {}
            Err(_) => self.stats.rejected += 1,
        }
    }

    fn fix(&self, now_ms: u64) -> Fix {
        let age_ms = match self.location {
            Some(_) => {
                let age = now_ms.saturating_sub(self.location_at_ms);
                u32::try_from(age).unwrap_or(u32::MAX - 1)
            }
            None => u32::MAX,
        };

        Fix {
            location: self.location,
            date: self.date,
            time: self.time,
            age_ms,
        }
    }
}

fn to_date(date: NaiveDate) -> Option<Date> {
    Some(Date {
        year: u16::try_from(date.year()).ok()?,
        month: u8::try_from(date.month()).ok()?,
        day: u8::try_from(date.day()).ok()?,
    })
}

fn to_time(time: NaiveTime) -> Option<Time> {
    Some(Time {
        hour: u8::try_from(time.hour()).ok()?,
        minute: u8::try_from(time.minute()).ok()?,
        // Leap seconds come through as second 59 with extra nanoseconds
        second: u8::try_from(time.second()).ok()?,
    })
}
