//! In-memory peripherals for host tests

use std::collections::{BTreeMap, VecDeque};
use std::string::String;
use std::vec::Vec;

use waymark_hal::{
    Clock, FileStorage, OpenMode, OutputPin, SerialError, StorageError, UartRx, UartTx,
    WatchdogTimer,
};
use waymark_protocol::CSV_HEADER;

use crate::console::Console;
use crate::context::{Board, Context};
use crate::runtime::Parts;
use crate::traits::{Date, Fix, FixSource, Location, Time};

/// Captures everything written to the operator link
#[derive(Debug, Default)]
pub struct SerialLog {
    pub out: Vec<u8>,
    /// Reject every write
    pub broken: bool,
    pub flushed: bool,
}

impl SerialLog {
    pub fn text(&self) -> String {
        String::from_utf8(self.out.clone()).unwrap()
    }

    /// Emitted lines, terminators removed
    pub fn lines(&self) -> Vec<String> {
        let text = self.text();
        let mut lines: Vec<String> = text.split("\r\n").map(str::to_owned).collect();
        if lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines
    }
}

impl UartTx for SerialLog {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), SerialError> {
        if self.broken {
            return Err(SerialError::Other);
        }
        self.out.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SerialError> {
        self.flushed = true;
        Ok(())
    }
}

/// Receiver fed by the test
#[derive(Debug, Default)]
pub struct ScriptedRx {
    pub pending: VecDeque<u8>,
    /// Report one overrun once the pending bytes run out
    pub error_after_drain: bool,
}

impl ScriptedRx {
    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes.iter().copied());
    }
}

impl UartRx for ScriptedRx {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        if self.pending.is_empty() && self.error_after_drain {
            self.error_after_drain = false;
            return Err(SerialError::Overrun);
        }
        let mut n = 0;
        while n < buf.len() {
            match self.pending.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

/// Handle into [`MemStorage`]
#[derive(Debug)]
pub struct MemHandle {
    id: u32,
    name: String,
    pos: usize,
}

/// Flat in-memory filesystem
#[derive(Debug, Default)]
pub struct MemStorage {
    pub files: BTreeMap<String, Vec<u8>>,
    pub ready: bool,
    pub fail_init: bool,
    pub fail_open: bool,
    pub fail_append: bool,
    pub fail_remove: bool,
    pub fail_list: bool,
    /// Refuse to open a file that is already open, like FAT drivers do
    pub exclusive_open: bool,
    pub syncs: usize,
    open: Vec<(u32, String)>,
    next_id: u32,
}

impl MemStorage {
    /// Storage that is already initialised
    pub fn ready() -> Self {
        Self {
            ready: true,
            ..Self::default()
        }
    }

    pub fn put(&mut self, name: &str, content: &str) {
        self.files.insert(name.to_owned(), content.as_bytes().to_vec());
    }

    pub fn text(&self, name: &str) -> String {
        String::from_utf8(self.files[name].clone()).unwrap()
    }

    /// Data rows in a file, header excluded
    pub fn rows(&self, name: &str) -> usize {
        self.text(name)
            .split("\r\n")
            .filter(|line| !line.is_empty() && *line != CSV_HEADER)
            .count()
    }

    pub fn is_open(&self, name: &str) -> bool {
        self.open.iter().any(|(_, open)| open == name)
    }
}

impl FileStorage for MemStorage {
    type Handle = MemHandle;

    fn init(&mut self) -> Result<(), StorageError> {
        if self.fail_init {
            return Err(StorageError::NotReady);
        }
        self.ready = true;
        Ok(())
    }

    fn exists(&mut self, name: &str) -> bool {
        self.ready && self.files.contains_key(name)
    }

    fn open(&mut self, name: &str, mode: OpenMode) -> Result<MemHandle, StorageError> {
        if !self.ready {
            return Err(StorageError::NotReady);
        }
        if self.fail_open {
            return Err(StorageError::Io);
        }
        if name.is_empty() {
            return Err(StorageError::InvalidName);
        }
        if self.exclusive_open && self.is_open(name) {
            return Err(StorageError::Io);
        }
        match mode {
            OpenMode::Read if !self.files.contains_key(name) => {
                return Err(StorageError::NotFound)
            }
            OpenMode::Read => {}
            OpenMode::Append => {
                self.files.entry(name.to_owned()).or_default();
            }
        }

        self.next_id += 1;
        self.open.push((self.next_id, name.to_owned()));
        Ok(MemHandle {
            id: self.next_id,
            name: name.to_owned(),
            pos: 0,
        })
    }

    fn read(&mut self, handle: &mut MemHandle, buf: &mut [u8]) -> Result<usize, StorageError> {
        let data = self.files.get(&handle.name).ok_or(StorageError::NotFound)?;
        let rest = &data[handle.pos.min(data.len())..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        handle.pos += n;
        Ok(n)
    }

    fn append(&mut self, handle: &mut MemHandle, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_append {
            return Err(StorageError::Io);
        }
        self.files
            .get_mut(&handle.name)
            .ok_or(StorageError::NotFound)?
            .extend_from_slice(data);
        Ok(())
    }

    fn sync(&mut self, _handle: &mut MemHandle) -> Result<(), StorageError> {
        self.syncs += 1;
        Ok(())
    }

    fn close(&mut self, handle: MemHandle) {
        self.open.retain(|(id, _)| *id != handle.id);
    }

    fn list(&mut self, visit: &mut dyn FnMut(&str)) -> Result<(), StorageError> {
        if self.fail_list || !self.ready {
            return Err(StorageError::Io);
        }
        for name in self.files.keys() {
            visit(name);
        }
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<(), StorageError> {
        if self.fail_remove || self.is_open(name) {
            return Err(StorageError::Io);
        }
        self.files
            .remove(name)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

/// Fix source returning whatever the test sets
#[derive(Debug, Default)]
pub struct ScriptedFix {
    pub current: Fix,
    /// Every byte fed through `encode`
    pub bytes: Vec<u8>,
}

impl FixSource for ScriptedFix {
    fn encode(&mut self, byte: u8, _now_ms: u64) {
        self.bytes.push(byte);
    }

    fn fix(&self, _now_ms: u64) -> Fix {
        self.current
    }
}

#[derive(Debug, Default)]
pub struct TestLed {
    pub high: bool,
}

impl OutputPin for TestLed {
    fn set_high(&mut self) {
        self.high = true;
    }

    fn set_low(&mut self) {
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

#[derive(Debug, Default)]
pub struct ManualClock {
    pub now: u64,
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now
    }
}

#[derive(Debug, Default)]
pub struct CountingWatchdog {
    pub started: Option<u32>,
    pub starts: u32,
    pub feeds: u32,
}

impl WatchdogTimer for CountingWatchdog {
    fn start(&mut self, timeout_ms: u32) {
        self.started = Some(timeout_ms);
        self.starts += 1;
    }

    fn feed(&mut self) {
        self.feeds += 1;
    }

    fn park(&mut self) {
        panic!("watchdog parked");
    }
}

pub struct TestBoard;

impl Board for TestBoard {
    type Storage = MemStorage;
    type Fix = ScriptedFix;
    type Console = SerialLog;
    type Commands = ScriptedRx;
    type Gnss = ScriptedRx;
    type Led = TestLed;
    type Clock = ManualClock;
    type Watchdog = CountingWatchdog;
}

/// Context with mounted storage and debug output on
pub fn context() -> Context<TestBoard> {
    Context {
        storage: MemStorage::ready(),
        fix: ScriptedFix::default(),
        console: Console::new(SerialLog::default(), true),
        status_led: TestLed::default(),
        clock: ManualClock::default(),
    }
}

/// Fresh peripherals, storage not yet initialised
pub fn parts() -> Parts<TestBoard> {
    Parts {
        storage: MemStorage::default(),
        fix: ScriptedFix::default(),
        console: SerialLog::default(),
        commands: ScriptedRx::default(),
        gnss: ScriptedRx::default(),
        status_led: TestLed::default(),
        clock: ManualClock::default(),
        watchdog: CountingWatchdog::default(),
    }
}

/// London fix on 2024-06-01 at 12:00:`second`
pub fn located_fix(second: u8, age_ms: u32) -> Fix {
    Fix {
        location: Some(Location {
            latitude: 51.5073509,
            longitude: -0.1277583,
        }),
        date: Some(Date {
            year: 2024,
            month: 6,
            day: 1,
        }),
        time: Some(Time {
            hour: 12,
            minute: 0,
            second,
        }),
        age_ms,
    }
}
