//! Supervisor loop
//!
//! Boot brings up storage, arms the watchdog and opens the session file.
//! Each loop iteration then runs, in order:
//! 1. status LED off
//! 2. at most one operator command
//! 3. interval-gated record attempt
//! 4. drain of pending receiver bytes into the fix decoder
//! 5. watchdog reset
//!
//! A fatal error skips the reset and parks until the watchdog reboots.

use core::fmt::Write;

use heapless::String;
use waymark_hal::{Clock, FileStorage, OutputPin, UartRx};

use crate::config::{LoggerConfig, GNSS_DRAIN_LIMIT};
use crate::console::Console;
use crate::context::{Board, Context};
use crate::dispatch::CommandDispatcher;
use crate::session::LoggingController;
use crate::traits::FixSource;
use crate::watchdog::{FatalKind, WatchdogSupervisor};

const HELP_START: &str =
    "Send 'START {FILENAME}' to begin logging, 'STOP' to end logging,";
const HELP_BROWSE: &str = "'LIST' to list files, 'READ {FILENAME}' to read a file.";

/// Peripherals handed over by the board at startup
pub struct Parts<B: Board> {
    pub storage: B::Storage,
    pub fix: B::Fix,
    pub console: B::Console,
    pub commands: B::Commands,
    pub gnss: B::Gnss,
    pub status_led: B::Led,
    pub clock: B::Clock,
    pub watchdog: B::Watchdog,
}

/// Process-wide logger state
pub struct Runtime<B: Board> {
    ctx: Context<B>,
    logger: LoggingController<B>,
    dispatcher: CommandDispatcher<B>,
    gnss: B::Gnss,
    supervisor: WatchdogSupervisor<B::Watchdog>,
    session_range: u32,
}

impl<B: Board> Runtime<B> {
    pub fn new(parts: Parts<B>, config: &LoggerConfig) -> Self {
        Self {
            ctx: Context {
                storage: parts.storage,
                fix: parts.fix,
                console: Console::new(parts.console, config.debug_on_boot),
                status_led: parts.status_led,
                clock: parts.clock,
            },
            logger: LoggingController::new(config),
            dispatcher: CommandDispatcher::new(parts.commands),
            gnss: parts.gnss,
            supervisor: WatchdogSupervisor::new(parts.watchdog, config.watchdog_timeout_ms),
            session_range: config.session_range.max(1),
        }
    }

    /// Bring up storage, arm the watchdog and start the boot session
    ///
    /// The session file is `<session_number mod session_range>.csv`.
    pub fn boot(&mut self, session_number: u32) -> Result<(), FatalKind> {
        self.ctx
            .console
            .always(format_args!("Initialising SD card..."));

        if let Err(_e) = self.ctx.storage.init() {
            #[cfg(feature = "defmt")]
            defmt::error!("storage init failed: {}", _e);
            return Err(FatalKind::StorageInit);
        }
        self.ctx.console.always(format_args!("SD card initialized."));

        self.supervisor.arm();

        self.ctx.console.always(format_args!("{}", HELP_START));
        self.ctx.console.always(format_args!("{}", HELP_BROWSE));

        let filename = session_filename(session_number % self.session_range);
        self.logger.start(&mut self.ctx, &filename)
    }

    /// Run one loop iteration
    pub fn poll_once(&mut self) -> Result<(), FatalKind> {
        self.ctx.status_led.set_low();
        self.dispatcher
            .poll_and_dispatch(&mut self.ctx, &mut self.logger)?;

        let now_ms = self.ctx.clock.now_ms();
        self.logger.record_data(&mut self.ctx, now_ms);

        self.drain_fix_bytes();
        self.supervisor.reset();
        Ok(())
    }

    /// Report `kind` and wait for the watchdog reset
    pub fn halt_fatal(&mut self, kind: FatalKind) -> ! {
        self.supervisor.halt_fatal(kind, &mut self.ctx.console)
    }

    /// Shared peripherals
    pub fn context(&self) -> &Context<B> {
        &self.ctx
    }

    /// Shared peripherals, mutably
    pub fn context_mut(&mut self) -> &mut Context<B> {
        &mut self.ctx
    }

    pub fn logger(&self) -> &LoggingController<B> {
        &self.logger
    }

    pub fn supervisor(&self) -> &WatchdogSupervisor<B::Watchdog> {
        &self.supervisor
    }

    /// Feed whatever the receiver has buffered to the fix decoder
    fn drain_fix_bytes(&mut self) {
        let mut buf = [0u8; 64];
        let mut drained = 0;

        while drained < GNSS_DRAIN_LIMIT {
            let want = buf.len().min(GNSS_DRAIN_LIMIT - drained);
            let n = match self.gnss.read_available(&mut buf[..want]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("gnss link error: {}", _e);
                    break;
                }
            };

            let now_ms = self.ctx.clock.now_ms();
            for &byte in &buf[..n] {
                self.ctx.fix.encode(byte, now_ms);
            }
            drained += n;
        }
    }
}

fn session_filename(number: u32) -> String<16> {
    let mut name = String::new();
    // u32::MAX is 10 digits, "<n>.csv" always fits
    let _ = write!(name, "{}.csv", number);
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{located_fix, parts, TestBoard};
    use crate::watchdog::SupervisorState;

    fn runtime() -> Runtime<TestBoard> {
        Runtime::new(parts(), &LoggerConfig::default())
    }

    fn booted(session_number: u32) -> Runtime<TestBoard> {
        let mut rt = runtime();
        rt.boot(session_number).unwrap();
        rt
    }

    fn tick(rt: &mut Runtime<TestBoard>, now_ms: u64) {
        rt.context_mut().clock.now = now_ms;
        rt.poll_once().unwrap();
    }

    fn type_command(rt: &mut Runtime<TestBoard>, line: &str) {
        let rx = rt.dispatcher.rx_mut();
        rx.push(line.as_bytes());
        rx.push(b"\r\n");
    }

    #[test]
    fn test_session_filename() {
        assert_eq!(session_filename(0).as_str(), "0.csv");
        assert_eq!(session_filename(999).as_str(), "999.csv");
        assert_eq!(session_filename(u32::MAX).as_str(), "4294967295.csv");
    }

    #[test]
    fn test_boot_banner_and_session() {
        let rt = booted(1042);

        assert_eq!(rt.logger().active_file(), Some("42.csv"));
        assert_eq!(
            rt.context().console.tx().lines(),
            [
                "Initialising SD card...",
                "SD card initialized.",
                HELP_START,
                HELP_BROWSE,
            ]
        );
        assert_eq!(rt.context().storage.text("42.csv"), "Timestamp,Lat,Lon\r\n");
        assert_eq!(rt.supervisor().state(), SupervisorState::Running);
    }

    #[test]
    fn test_full_width_session_number_wraps_into_range() {
        let rt = booted(u32::MAX);

        assert_eq!(rt.logger().active_file(), Some("295.csv"));
        assert_eq!(rt.context().storage.text("295.csv"), "Timestamp,Lat,Lon\r\n");
    }

    #[test]
    fn test_boot_storage_failure() {
        let mut rt = runtime();
        rt.context_mut().storage.fail_init = true;

        assert_eq!(rt.boot(7), Err(FatalKind::StorageInit));
        assert_eq!(rt.supervisor().state(), SupervisorState::Disarmed);
        assert_eq!(
            rt.context().console.tx().lines(),
            ["Initialising SD card..."]
        );
    }

    #[test]
    #[should_panic(expected = "parked")]
    fn test_boot_failure_halts_with_reason() {
        let mut rt = runtime();
        rt.context_mut().storage.fail_init = true;
        let kind = rt.boot(7).unwrap_err();
        rt.halt_fatal(kind);
    }

    #[test]
    fn test_boot_log_open_failure_is_fatal() {
        let mut rt = runtime();
        rt.context_mut().storage.fail_open = true;

        assert_eq!(rt.boot(7), Err(FatalKind::LogFileOpen));
        assert_eq!(rt.supervisor().state(), SupervisorState::Running);
    }

    #[test]
    fn test_watchdog_reset_once_per_iteration() {
        let mut rt = booted(1);
        for i in 1..=5 {
            tick(&mut rt, i * 10);
        }
        assert_eq!(rt.supervisor().timer().feeds, 5);
    }

    #[test]
    fn test_led_low_each_iteration_high_after_write() {
        let mut rt = booted(1);
        rt.context_mut().fix.current = located_fix(5, 20);

        tick(&mut rt, 100);
        assert!(rt.context().status_led.is_set_high());

        tick(&mut rt, 150);
        assert!(rt.context().status_led.is_set_low());
    }

    #[test]
    fn test_gnss_bytes_reach_decoder() {
        let mut rt = booted(1);
        rt.gnss.push(b"$GPRMC,...\r\n");

        tick(&mut rt, 10);

        assert_eq!(rt.context().fix.bytes, b"$GPRMC,...\r\n");
    }

    #[test]
    fn test_gnss_drain_bounded() {
        let mut rt = booted(1);
        rt.gnss.push(&[b'x'; GNSS_DRAIN_LIMIT + 100]);

        tick(&mut rt, 10);
        assert_eq!(rt.context().fix.bytes.len(), GNSS_DRAIN_LIMIT);

        tick(&mut rt, 20);
        assert_eq!(rt.context().fix.bytes.len(), GNSS_DRAIN_LIMIT + 100);
    }

    #[test]
    fn test_records_at_interval_into_boot_file() {
        let mut rt = booted(5);
        rt.context_mut().fix.current = located_fix(5, 20);

        for now in (0..=1000).step_by(10) {
            tick(&mut rt, now);
        }

        assert_eq!(rt.context().storage.rows("5.csv"), 10);
    }

    #[test]
    fn test_stop_then_start_switches_files() {
        let mut rt = booted(5);
        rt.context_mut().fix.current = located_fix(5, 20);
        tick(&mut rt, 100);

        type_command(&mut rt, "STOP");
        tick(&mut rt, 110);
        type_command(&mut rt, "start trip.csv");
        tick(&mut rt, 120);
        tick(&mut rt, 200);

        assert_eq!(rt.context().storage.rows("5.csv"), 1);
        assert_eq!(rt.context().storage.rows("trip.csv"), 1);
        assert_eq!(rt.logger().active_file(), Some("trip.csv"));
    }

    #[test]
    fn test_delete_active_file_end_to_end() {
        let mut rt = booted(5);

        type_command(&mut rt, "DELETE 5.csv");
        tick(&mut rt, 10);

        assert!(!rt.logger().is_logging());
        assert!(!rt.context().storage.files.contains_key("5.csv"));
    }

    #[test]
    fn test_debug_toggle_gates_output() {
        let mut rt = booted(5);
        let banner = rt.context().console.tx().lines().len();

        type_command(&mut rt, "GPS");
        tick(&mut rt, 10);
        assert_eq!(rt.context().console.tx().lines().len(), banner);

        type_command(&mut rt, "DEBUG");
        tick(&mut rt, 20);
        type_command(&mut rt, "GPS");
        tick(&mut rt, 30);

        let lines = rt.context().console.tx().lines();
        assert_eq!(&lines[banner..], ["Debug Mode Enabled", "No valid GPS fix."]);
    }

    #[test]
    fn test_fatal_start_skips_watchdog_reset() {
        let mut rt = booted(5);
        rt.context_mut().storage.fail_open = true;
        type_command(&mut rt, "START other.csv");

        assert_eq!(rt.poll_once(), Err(FatalKind::LogFileOpen));
        assert_eq!(rt.supervisor().timer().feeds, 0);
    }

    fn is_row(line: &str) -> bool {
        let fields: std::vec::Vec<&str> = line.split(',').collect();
        let [stamp, lat, lon] = fields[..] else {
            return false;
        };
        let stamp_ok = stamp.len() == 19
            && stamp.char_indices().all(|(i, c)| match i {
                4 | 7 => c == '-',
                10 => c == ' ',
                13 | 16 => c == ':',
                _ => c.is_ascii_digit(),
            });
        let coord_ok = |v: &str| {
            let v = v.strip_prefix('-').unwrap_or(v);
            match v.split_once('.') {
                Some((int, frac)) => {
                    !int.is_empty()
                        && int.chars().all(|c| c.is_ascii_digit())
                        && frac.len() == 6
                        && frac.chars().all(|c| c.is_ascii_digit())
                }
                None => false,
            }
        };
        stamp_ok && coord_ok(lat) && coord_ok(lon)
    }

    #[test]
    fn test_scenario_boot_opens_numbered_file() {
        let rt = booted(123);

        assert!(rt.logger().is_logging());
        assert_eq!(rt.logger().active_file(), Some("123.csv"));
        assert_eq!(rt.context().storage.text("123.csv"), "Timestamp,Lat,Lon\r\n");
    }

    #[test]
    fn test_scenario_five_fixes_five_rows() {
        let mut rt = booted(123);
        type_command(&mut rt, "START test.csv");
        tick(&mut rt, 10);

        for i in 0..5u8 {
            let now = 120 * (u64::from(i) + 1);
            rt.context_mut().fix.current = located_fix(10 + i, 30);
            tick(&mut rt, now);
        }

        let text = rt.context().storage.text("test.csv");
        let lines: std::vec::Vec<&str> = text.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(lines[0], "Timestamp,Lat,Lon");
        let rows = &lines[1..];
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|row| is_row(row)));
        assert!(rows.windows(2).all(|pair| pair[0][..19] <= pair[1][..19]));
    }

    #[test]
    fn test_scenario_delete_active_then_list() {
        let mut rt = booted(123);
        type_command(&mut rt, "START test.csv");
        tick(&mut rt, 10);
        type_command(&mut rt, "DEBUG");
        tick(&mut rt, 20);

        type_command(&mut rt, "DELETE test.csv");
        tick(&mut rt, 30);
        type_command(&mut rt, "LIST");
        tick(&mut rt, 40);

        assert!(!rt.logger().is_logging());
        assert!(!rt.context().storage.is_open("test.csv"));
        let lines = rt.context().console.tx().lines();
        let listing = lines
            .iter()
            .position(|l| l == "Listing files on SD Card:")
            .unwrap();
        assert_eq!(&lines[listing + 1..], ["123.csv"]);
    }

    #[test]
    fn test_scenario_read_missing_file() {
        let mut rt = booted(123);
        type_command(&mut rt, "DEBUG");
        tick(&mut rt, 10);
        let before = rt.context().console.tx().lines().len();

        type_command(&mut rt, "READ missing.csv");
        tick(&mut rt, 20);

        let lines = rt.context().console.tx().lines();
        assert_eq!(&lines[before..], ["File does not exist: missing.csv"]);
        assert_eq!(rt.logger().active_file(), Some("123.csv"));
    }

    #[test]
    fn test_header_written_once_per_file() {
        let mut rt = booted(1);
        for line in ["START a.csv", "STOP", "START a.csv", "START a.csv"] {
            type_command(&mut rt, line);
        }
        for now in 1..=4 {
            tick(&mut rt, now);
        }

        assert_eq!(rt.context().storage.text("a.csv"), "Timestamp,Lat,Lon\r\n");
    }

    #[test]
    fn test_writes_follow_latest_start() {
        let mut rt = booted(1);
        rt.context_mut().fix.current = located_fix(5, 20);
        type_command(&mut rt, "START a.csv");
        tick(&mut rt, 10);
        type_command(&mut rt, "START b.csv");
        tick(&mut rt, 20);

        for now in [100, 200, 300] {
            tick(&mut rt, now);
        }

        assert!(!rt.context().storage.is_open("a.csv"));
        assert_eq!(rt.context().storage.rows("a.csv"), 0);
        assert_eq!(rt.context().storage.rows("b.csv"), 3);
    }
}
