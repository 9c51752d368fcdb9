//! Waymark Operator Protocol
//!
//! This crate defines the two text formats the logger speaks: the
//! line-oriented command protocol on the operator serial link, and the CSV
//! layout of the log files it writes.
//!
//! # Command Protocol
//!
//! One ASCII command per newline-terminated line, verb matched
//! case-insensitively:
//! ```text
//! START <filename>
//! STOP
//! LIST
//! READ <filename>
//! DELETE <filename>
//! DEBUG
//! GPS
//! ```
//!
//! # Log Format
//!
//! ```text
//! Timestamp,Lat,Lon
//! 2024-06-01 12:00:05,51.507351,-0.127758
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod line;
pub mod record;

pub use command::{parse, CommandRequest, Verb, AVAILABLE_COMMANDS};
pub use line::{LineAssembler, LineError};
pub use record::{LogRecord, RecordError, Timestamp, CSV_HEADER, LINE_ENDING, MAX_RECORD_LEN};
