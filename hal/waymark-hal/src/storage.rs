//! File storage abstractions
//!
//! Provides a small file API over removable block storage (SD cards).
//! Everything lives in the root directory of a single volume; names are
//! whatever the filesystem driver accepts (8.3 on FAT).

use core::fmt;

/// How a file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OpenMode {
    /// Read from the start, fails if the file is missing
    Read,
    /// Create if missing, writes go to the end of the file
    Append,
}

/// Errors from storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Medium missing or not yet initialized
    NotReady,
    /// No file with that name
    NotFound,
    /// Name rejected by the filesystem
    InvalidName,
    /// Volume has no free clusters
    Full,
    /// Too many files open at once
    TooManyOpen,
    /// Block device or filesystem fault
    Io,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotReady => f.write_str("storage not ready"),
            StorageError::NotFound => f.write_str("file not found"),
            StorageError::InvalidName => f.write_str("invalid file name"),
            StorageError::Full => f.write_str("storage full"),
            StorageError::TooManyOpen => f.write_str("too many open files"),
            StorageError::Io => f.write_str("storage I/O error"),
        }
    }
}

/// File storage trait
///
/// Handles are owned values: [`FileStorage::close`] consumes them, so a
/// closed handle can never be written again.
pub trait FileStorage {
    /// Open file handle
    type Handle;

    /// Bring up the medium and mount the volume
    fn init(&mut self) -> Result<(), StorageError>;

    /// Check if a file exists in the root directory
    fn exists(&mut self, name: &str) -> bool;

    /// Open a file
    fn open(&mut self, name: &str, mode: OpenMode) -> Result<Self::Handle, StorageError>;

    /// Read the next bytes of a file
    ///
    /// Returns `0` once the end of the file has been reached.
    fn read(&mut self, handle: &mut Self::Handle, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Append bytes at the end of a file opened with [`OpenMode::Append`]
    fn append(&mut self, handle: &mut Self::Handle, data: &[u8]) -> Result<(), StorageError>;

    /// Force buffered data and directory metadata onto the medium
    fn sync(&mut self, handle: &mut Self::Handle) -> Result<(), StorageError>;

    /// Close a file, flushing anything still buffered
    fn close(&mut self, handle: Self::Handle);

    /// Visit every entry of the root directory in driver order
    fn list(&mut self, visit: &mut dyn FnMut(&str)) -> Result<(), StorageError>;

    /// Delete a file
    fn remove(&mut self, name: &str) -> Result<(), StorageError>;
}
