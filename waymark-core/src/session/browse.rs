//! Read-only operator commands: LIST, READ, DEBUG, GPS

use waymark_hal::{Clock, FileStorage, OpenMode};

use super::controller::LoggingController;
use super::reader::{FileReader, ReadProgress};
use crate::config::{LIST_ENTRIES_PER_POLL, READ_LINES_PER_POLL};
use crate::context::{Board, Context};
use crate::traits::FixSource;

impl<B: Board> LoggingController<B> {
    /// LIST: print every file in the root directory
    ///
    /// Entries go out in batches, one batch per loop iteration, through
    /// [`LoggingController::continue_browse`].
    pub fn list(&mut self, ctx: &mut Context<B>) {
        ctx.console.info(format_args!("Listing files on SD Card:"));
        self.listed = Some(0);
        self.continue_list(ctx);
    }

    /// READ: open `filename` and start printing it
    ///
    /// The first lines go out immediately; the rest follow on later loop
    /// iterations through [`LoggingController::continue_browse`].
    pub fn read(&mut self, ctx: &mut Context<B>, filename: &str) {
        if !ctx.storage.exists(filename) {
            ctx.console
                .info(format_args!("File does not exist: {}", filename));
            return;
        }

        let handle = match ctx.storage.open(filename, OpenMode::Read) {
            Ok(handle) => handle,
            Err(_) => {
                ctx.console
                    .info(format_args!("Error opening file for reading: {}", filename));
                return;
            }
        };

        ctx.console.info(format_args!("Reading file: {}", filename));
        self.reader = Some(FileReader::new(handle));
        self.continue_read(ctx);
    }

    /// Check if a LIST or READ is still printing
    pub fn browse_in_progress(&self) -> bool {
        self.reader.is_some() || self.listed.is_some()
    }

    /// Print the next batch of whichever LIST or READ is in progress
    pub fn continue_browse(&mut self, ctx: &mut Context<B>) {
        if self.reader.is_some() {
            self.continue_read(ctx);
        } else {
            self.continue_list(ctx);
        }
    }

    /// Print the next batch of directory entries
    ///
    /// The directory is walked from the start each time; entries printed
    /// on earlier iterations are skipped.
    fn continue_list(&mut self, ctx: &mut Context<B>) {
        let Some(skip) = self.listed else {
            return;
        };
        let end = skip + LIST_ENTRIES_PER_POLL;

        let console = &mut ctx.console;
        let mut seen = 0;
        let listed = ctx.storage.list(&mut |name: &str| {
            if (skip..end).contains(&seen) {
                console.info(format_args!("{}", name));
            }
            seen += 1;
        });

        self.listed = match listed {
            Ok(()) if seen > end => Some(end),
            Ok(()) => None,
            Err(_) => {
                ctx.console
                    .info(format_args!("Failed to open root directory."));
                None
            }
        };
    }

    /// Print the next batch of an in-progress READ
    fn continue_read(&mut self, ctx: &mut Context<B>) {
        let Some(reader) = self.reader.as_mut() else {
            return;
        };

        let progress = reader.pump(&mut ctx.storage, &mut ctx.console, READ_LINES_PER_POLL);
        if progress == ReadProgress::Finished {
            if let Some(reader) = self.reader.take() {
                ctx.storage.close(reader.into_handle());
            }
            ctx.console.info(format_args!("File read complete."));
        }
    }

    /// DEBUG: flip diagnostic output
    ///
    /// Both transitions announce themselves: enabling after the flip,
    /// disabling before it.
    pub fn toggle_debug(&mut self, ctx: &mut Context<B>) {
        if ctx.console.debug_enabled() {
            ctx.console.info(format_args!("Disabling Debug Mode"));
            ctx.console.set_debug(false);
        } else {
            ctx.console.set_debug(true);
            ctx.console.info(format_args!("Debug Mode Enabled"));
        }
    }

    /// GPS: print the current fix
    pub fn report_fix(&mut self, ctx: &mut Context<B>) {
        let fix = ctx.fix.fix(ctx.clock.now_ms());

        match fix.location {
            Some(location) => {
                ctx.console
                    .info(format_args!("Latitude: {:.6}", location.latitude));
                ctx.console
                    .info(format_args!("Longitude: {:.6}", location.longitude));
                ctx.console.info(format_args!("Age: {}ms", fix.age_ms));
            }
            None => ctx.console.info(format_args!("No valid GPS fix.")),
        }
    }
}
