//! Operator command intake and routing
//!
//! At most one command is handled per loop iteration. While a LIST or
//! READ is still printing, new commands wait in the receive buffer.

use heapless::String;
use waymark_hal::UartRx;
use waymark_protocol::{parse, LineAssembler, LineError, Verb, AVAILABLE_COMMANDS};

use crate::config::{COMMAND_POLL_LIMIT, MAX_COMMAND_LEN};
use crate::context::{Board, Context};
use crate::session::LoggingController;
use crate::watchdog::FatalKind;

/// Non-blocking line reader over a serial receiver
pub struct LineReader<R: UartRx> {
    rx: R,
    assembler: LineAssembler<MAX_COMMAND_LEN>,
}

impl<R: UartRx> LineReader<R> {
    pub fn new(rx: R) -> Self {
        Self {
            rx,
            assembler: LineAssembler::new(),
        }
    }

    /// Consume buffered bytes until a line completes or the buffer is empty
    ///
    /// Receiver errors drop the partial line.
    pub fn poll_line(&mut self) -> Result<Option<String<MAX_COMMAND_LEN>>, LineError> {
        for _ in 0..COMMAND_POLL_LIMIT {
            match self.rx.try_read_byte() {
                Ok(Some(byte)) => {
                    if let Some(line) = self.assembler.feed(byte)? {
                        return Ok(Some(line));
                    }
                }
                Ok(None) => break,
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("command link error: {}", _e);
                    self.assembler.reset();
                    break;
                }
            }
        }
        Ok(None)
    }
}

/// Routes operator commands to the logging controller
pub struct CommandDispatcher<B: Board> {
    reader: LineReader<B::Commands>,
}

impl<B: Board> CommandDispatcher<B> {
    pub fn new(commands: B::Commands) -> Self {
        Self {
            reader: LineReader::new(commands),
        }
    }

    #[cfg(test)]
    pub(crate) fn rx_mut(&mut self) -> &mut B::Commands {
        &mut self.reader.rx
    }

    /// Handle at most one pending command
    ///
    /// Only a failed START propagates an error.
    pub fn poll_and_dispatch(
        &mut self,
        ctx: &mut Context<B>,
        logger: &mut LoggingController<B>,
    ) -> Result<(), FatalKind> {
        if logger.browse_in_progress() {
            logger.continue_browse(ctx);
            return Ok(());
        }

        match self.reader.poll_line() {
            Ok(Some(line)) => dispatch(ctx, logger, &line),
            Ok(None) => Ok(()),
            Err(e) => {
                ctx.console.info(format_args!("Ignoring command: {}", e));
                Ok(())
            }
        }
    }
}

fn dispatch<B: Board>(
    ctx: &mut Context<B>,
    logger: &mut LoggingController<B>,
    line: &str,
) -> Result<(), FatalKind> {
    let request = parse(line);

    #[cfg(feature = "defmt")]
    defmt::debug!("command {}", request.verb);

    match request.verb {
        Verb::Start => logger.start(ctx, request.parameter)?,
        Verb::Stop => logger.stop(ctx),
        Verb::List => logger.list(ctx),
        Verb::Read => logger.read(ctx, request.parameter),
        Verb::Delete => logger.delete(ctx, request.parameter),
        Verb::Debug => logger.toggle_debug(ctx),
        Verb::Gps => logger.report_fix(ctx),
        Verb::Unknown => {
            ctx.console
                .info(format_args!("Unknown command: {}", line.trim()));
            ctx.console.info(format_args!("{}", AVAILABLE_COMMANDS));
        }
    }
    Ok(())
}
