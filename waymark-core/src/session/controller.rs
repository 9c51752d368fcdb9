//! Log session state machine
//!
//! At most one log file is open at a time. Logging is active exactly when
//! a session (and therefore an open handle) is held.
//!
//! Record attempts are gated by the logging interval; the gate advances on
//! every attempt, written or not.

use heapless::String;
use waymark_hal::{FileStorage, OpenMode, OutputPin, StorageError};
use waymark_protocol::{CSV_HEADER, LINE_ENDING};

use super::reader::FileReader;
use crate::config::{LoggerConfig, MAX_FILENAME_LEN};
use crate::context::{Board, Context, FileHandle};
use crate::traits::FixSource;
use crate::watchdog::FatalKind;

/// The open log file
pub(super) struct Session<H> {
    pub(super) filename: String<MAX_FILENAME_LEN>,
    pub(super) handle: H,
}

/// Owns the log session and the in-progress READ or LIST, if any
pub struct LoggingController<B: Board> {
    pub(super) session: Option<Session<FileHandle<B>>>,
    pub(super) reader: Option<FileReader<FileHandle<B>>>,
    /// Entries already printed by an in-progress LIST
    pub(super) listed: Option<usize>,
    last_write_ms: u64,
    log_interval_ms: u64,
    max_fix_age_ms: u32,
}

impl<B: Board> LoggingController<B> {
    /// Create an idle controller
    pub fn new(config: &LoggerConfig) -> Self {
        Self {
            session: None,
            reader: None,
            listed: None,
            last_write_ms: 0,
            log_interval_ms: u64::from(config.log_interval_ms),
            max_fix_age_ms: config.max_fix_age_ms,
        }
    }

    /// Check if a log file is open
    pub fn is_logging(&self) -> bool {
        self.session.is_some()
    }

    /// Name of the open log file
    pub fn active_file(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.filename.as_str())
    }

    /// START: open `filename` for appending and begin logging
    ///
    /// A session already in progress is closed first. A new file gets the
    /// CSV header. Failing to open the file is fatal.
    pub fn start(&mut self, ctx: &mut Context<B>, filename: &str) -> Result<(), FatalKind> {
        if let Some(previous) = self.session.take() {
            ctx.storage.close(previous.handle);
        }

        let mut name = String::new();
        name.push_str(filename).map_err(|_| FatalKind::LogFileOpen)?;

        let existed = ctx.storage.exists(filename);
        let mut handle = ctx
            .storage
            .open(filename, OpenMode::Append)
            .map_err(|_| FatalKind::LogFileOpen)?;

        if !existed {
            ctx.console
                .info(format_args!("Adding CSV headers to new log file"));
            if append_line(&mut ctx.storage, &mut handle, CSV_HEADER).is_err() {
                ctx.console.info(format_args!("Error writing to log file."));
            }
        }

        #[cfg(feature = "defmt")]
        defmt::info!("logging to {}", filename);

        self.session = Some(Session {
            filename: name,
            handle,
        });
        ctx.console.info(format_args!("Logging started."));
        Ok(())
    }

    /// STOP: close the log file; does nothing when idle
    pub fn stop(&mut self, ctx: &mut Context<B>) {
        if let Some(session) = self.session.take() {
            ctx.storage.close(session.handle);
            ctx.console.info(format_args!("Logging stopped."));
        }
    }

    /// DELETE: stop logging, then remove `filename`
    ///
    /// Logging stops even when a different file is being written.
    pub fn delete(&mut self, ctx: &mut Context<B>, filename: &str) {
        if let Some(session) = self.session.take() {
            ctx.storage.close(session.handle);
            ctx.console
                .info(format_args!("Logging stopped to delete the file."));
        }

        if !ctx.storage.exists(filename) {
            ctx.console
                .info(format_args!("File does not exist: {}", filename));
            return;
        }

        match ctx.storage.remove(filename) {
            Ok(()) => ctx.console.info(format_args!("File deleted: {}", filename)),
            Err(_) => ctx
                .console
                .info(format_args!("Error deleting file: {}", filename)),
        }
    }

    /// Append one row if logging, the interval has elapsed and the fix is fresh
    ///
    /// Lights the status LED after a successful write. Write failures are
    /// reported and logging continues.
    pub fn record_data(&mut self, ctx: &mut Context<B>, now_ms: u64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if now_ms.saturating_sub(self.last_write_ms) < self.log_interval_ms {
            return;
        }
        self.last_write_ms = now_ms;

        let fix = ctx.fix.fix(now_ms);
        let Some(record) = fix.fresh_record(self.max_fix_age_ms) else {
            ctx.console.info(format_args!("No new data"));
            return;
        };
        let Ok(line) = record.to_line() else {
            ctx.console.info(format_args!("Discarding unprintable fix"));
            return;
        };

        match append_line(&mut ctx.storage, &mut session.handle, &line) {
            Ok(()) => {
                ctx.console.info(format_args!("New Line: {}", line));
                ctx.status_led.set_high();
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("log write failed: {}", _e);
                ctx.console.info(format_args!("Error writing to log file."));
            }
        }
    }
}

/// Write one CRLF-terminated row and push it to the medium
fn append_line<S: FileStorage>(
    storage: &mut S,
    handle: &mut S::Handle,
    line: &str,
) -> Result<(), StorageError> {
    storage.append(handle, line.as_bytes())?;
    storage.append(handle, LINE_ENDING.as_bytes())?;
    storage.sync(handle)
}
