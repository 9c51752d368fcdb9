//! Configuration type definitions

/// Maximum operator command line length, terminator excluded
pub const MAX_COMMAND_LEN: usize = 96;

/// Maximum log filename length
///
/// Equal to the command capacity so any name typed by the operator fits.
pub const MAX_FILENAME_LEN: usize = MAX_COMMAND_LEN;

/// Maximum line length emitted by READ
pub const READ_LINE_LEN: usize = 128;

/// Lines emitted per loop iteration while a READ is in progress
pub const READ_LINES_PER_POLL: usize = 8;

/// Directory entries emitted per loop iteration while a LIST is in progress
pub const LIST_ENTRIES_PER_POLL: usize = 8;

/// Bytes of receiver data fed to the fix parser per loop iteration
pub const GNSS_DRAIN_LIMIT: usize = 256;

/// Operator bytes consumed per loop iteration
pub const COMMAND_POLL_LIMIT: usize = 256;

/// Logger configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoggerConfig {
    /// Minimum spacing between record attempts (ms)
    pub log_interval_ms: u32,
    /// Fixes older than this are not recorded (ms)
    pub max_fix_age_ms: u32,
    /// Hardware watchdog timeout (ms)
    pub watchdog_timeout_ms: u32,
    /// Operator link baud rate
    pub command_baud: u32,
    /// Receiver link baud rate
    pub gnss_baud: u32,
    /// Boot session file is `<n>.csv` with `n < session_range`
    pub session_range: u32,
    /// Diagnostic output enabled at power-on
    pub debug_on_boot: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_interval_ms: 100,
            max_fix_age_ms: 150,
            watchdog_timeout_ms: 8000,
            command_baud: 9600,
            gnss_baud: 9600,
            session_range: 1000,
            debug_on_boot: false,
        }
    }
}

/// Accepted range for each numeric key
pub const LOG_INTERVAL_RANGE: (u32, u32) = (10, 60_000);
pub const MAX_FIX_AGE_RANGE: (u32, u32) = (1, 10_000);
/// The RP2040 watchdog counter tops out just above 8.3 s
pub const WATCHDOG_TIMEOUT_RANGE: (u32, u32) = (1_000, 8_300);
pub const BAUD_RANGE: (u32, u32) = (1_200, 921_600);
pub const SESSION_RANGE_RANGE: (u32, u32) = (1, 100_000);
