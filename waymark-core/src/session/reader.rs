//! Incremental file dump
//!
//! READ output is spread over loop iterations so the watchdog keeps being
//! reset while a long file is printed.

use waymark_hal::{FileStorage, UartTx};
use waymark_protocol::LineAssembler;

use crate::config::READ_LINE_LEN;
use crate::console::Console;

const READ_CHUNK: usize = 64;

/// Outcome of one pump step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadProgress {
    /// More of the file remains
    Pending,
    /// End of file reached or the read failed
    Finished,
}

/// A file being printed line by line
pub struct FileReader<H> {
    handle: H,
    assembler: LineAssembler<READ_LINE_LEN>,
    chunk: [u8; READ_CHUNK],
    pos: usize,
    len: usize,
}

impl<H> FileReader<H> {
    /// Start reading from an open handle
    pub fn new(handle: H) -> Self {
        Self {
            handle,
            assembler: LineAssembler::new(),
            chunk: [0; READ_CHUNK],
            pos: 0,
            len: 0,
        }
    }

    /// Emit up to `max_lines` lines
    ///
    /// Also stops after roughly `max_lines` full lines worth of bytes so a
    /// file without newlines cannot stall the loop.
    pub fn pump<S, T>(
        &mut self,
        storage: &mut S,
        console: &mut Console<T>,
        max_lines: usize,
    ) -> ReadProgress
    where
        S: FileStorage<Handle = H>,
        T: UartTx,
    {
        let mut lines = 0;
        let mut budget = max_lines.max(1) * (READ_LINE_LEN + 2);

        loop {
            if self.pos == self.len {
                match storage.read(&mut self.handle, &mut self.chunk) {
                    Ok(0) => {
                        self.emit_tail(console);
                        return ReadProgress::Finished;
                    }
                    Ok(n) => {
                        self.pos = 0;
                        self.len = n;
                    }
                    Err(e) => {
                        console.info(format_args!("Error reading file: {}", e));
                        return ReadProgress::Finished;
                    }
                }
            }

            let byte = self.chunk[self.pos];
            self.pos += 1;
            budget -= 1;

            match self.assembler.feed(byte) {
                Ok(Some(line)) => {
                    console.info(format_args!("{}", line));
                    lines += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    console.info(format_args!("<{}>", e));
                    lines += 1;
                }
            }

            if lines >= max_lines || budget == 0 {
                return ReadProgress::Pending;
            }
        }
    }

    /// Give back the handle so it can be closed
    pub fn into_handle(self) -> H {
        self.handle
    }

    fn emit_tail<T: UartTx>(&mut self, console: &mut Console<T>) {
        match self.assembler.take_partial() {
            Some(Ok(line)) => console.info(format_args!("{}", line)),
            Some(Err(e)) => console.info(format_args!("<{}>", e)),
            None => {}
        }
    }
}
