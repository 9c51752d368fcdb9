//! SD card storage on FAT via embedded-sdmmc
//!
//! The card stays unmounted until [`FileStorage::init`]. Bring-up first
//! runs the board probe (card initialisation at identification speed and
//! the switch to working speed), then opens volume 0 and its root
//! directory. All files live in that root directory.

use core::fmt::Write;

use embedded_sdmmc::{
    BlockDevice, Error, Mode, RawDirectory, RawFile, TimeSource, Timestamp, VolumeIdx,
    VolumeManager,
};
use heapless::String;
use waymark_hal::{FileStorage, OpenMode, StorageError};

/// 8.3 name plus the dot
const SHORT_NAME_LEN: usize = 12;

/// Time source stamping every file with one fixed instant
///
/// The logger has no real-time clock; file times are not meaningful.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTimeSource;

impl TimeSource for FixedTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 54,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

enum Mount<D: BlockDevice, T: TimeSource> {
    Unmounted { device: D, time_source: T },
    Mounted {
        volume_mgr: VolumeManager<D, T>,
        root: RawDirectory,
    },
    Failed,
}

/// FAT storage backed by an SD card
pub struct SdmmcStorage<D, T, P>
where
    D: BlockDevice,
    T: TimeSource,
    P: FnMut(&D) -> bool,
{
    mount: Mount<D, T>,
    probe: P,
}

impl<D, T, P> SdmmcStorage<D, T, P>
where
    D: BlockDevice,
    T: TimeSource,
    P: FnMut(&D) -> bool,
{
    /// Wrap a card; `probe` returns `true` once the card answers
    pub fn new(device: D, time_source: T, probe: P) -> Self {
        Self {
            mount: Mount::Unmounted {
                device,
                time_source,
            },
            probe,
        }
    }

    fn mounted(&mut self) -> Result<(&mut VolumeManager<D, T>, RawDirectory), StorageError> {
        match &mut self.mount {
            Mount::Mounted { volume_mgr, root } => Ok((volume_mgr, *root)),
            _ => Err(StorageError::NotReady),
        }
    }
}

impl<D, T, P> FileStorage for SdmmcStorage<D, T, P>
where
    D: BlockDevice,
    T: TimeSource,
    P: FnMut(&D) -> bool,
{
    type Handle = RawFile;

    fn init(&mut self) -> Result<(), StorageError> {
        let (device, time_source) = match core::mem::replace(&mut self.mount, Mount::Failed) {
            Mount::Unmounted {
                device,
                time_source,
            } => (device, time_source),
            mounted @ Mount::Mounted { .. } => {
                self.mount = mounted;
                return Ok(());
            }
            Mount::Failed => return Err(StorageError::NotReady),
        };

        if !(self.probe)(&device) {
            self.mount = Mount::Unmounted {
                device,
                time_source,
            };
            return Err(StorageError::NotReady);
        }

        let mut volume_mgr = VolumeManager::new(device, time_source);
        let root = volume_mgr
            .open_raw_volume(VolumeIdx(0))
            .and_then(|volume| volume_mgr.open_root_dir(volume))
            .map_err(map_error)?;

        #[cfg(feature = "defmt")]
        defmt::info!("sd volume mounted");

        self.mount = Mount::Mounted { volume_mgr, root };
        Ok(())
    }

    fn exists(&mut self, name: &str) -> bool {
        let Ok((volume_mgr, root)) = self.mounted() else {
            return false;
        };
        volume_mgr.find_directory_entry(root, name).is_ok()
    }

    fn open(&mut self, name: &str, mode: OpenMode) -> Result<RawFile, StorageError> {
        let (volume_mgr, root) = self.mounted()?;
        let mode = match mode {
            OpenMode::Read => Mode::ReadOnly,
            OpenMode::Append => Mode::ReadWriteCreateOrAppend,
        };
        volume_mgr
            .open_file_in_dir(root, name, mode)
            .map_err(map_error)
    }

    fn read(&mut self, handle: &mut RawFile, buf: &mut [u8]) -> Result<usize, StorageError> {
        let (volume_mgr, _) = self.mounted()?;
        if volume_mgr.file_eof(*handle).map_err(map_error)? {
            return Ok(0);
        }
        volume_mgr.read(*handle, buf).map_err(map_error)
    }

    fn append(&mut self, handle: &mut RawFile, data: &[u8]) -> Result<(), StorageError> {
        let (volume_mgr, _) = self.mounted()?;
        volume_mgr.write(*handle, data).map_err(map_error)
    }

    fn sync(&mut self, handle: &mut RawFile) -> Result<(), StorageError> {
        let (volume_mgr, _) = self.mounted()?;
        volume_mgr.flush_file(*handle).map_err(map_error)
    }

    fn close(&mut self, handle: RawFile) {
        if let Ok((volume_mgr, _)) = self.mounted() {
            if let Err(_e) = volume_mgr.close_file(handle) {
                #[cfg(feature = "defmt")]
                defmt::warn!("close failed: {}", map_error(_e));
            }
        }
    }

    fn list(&mut self, visit: &mut dyn FnMut(&str)) -> Result<(), StorageError> {
        let (volume_mgr, root) = self.mounted()?;
        volume_mgr
            .iterate_dir(root, |entry| {
                if entry.attributes.is_volume() || entry.attributes.is_directory() {
                    return;
                }
                let mut name: String<SHORT_NAME_LEN> = String::new();
                if write!(name, "{}", entry.name).is_ok() {
                    visit(&name);
                }
            })
            .map_err(map_error)
    }

    fn remove(&mut self, name: &str) -> Result<(), StorageError> {
        let (volume_mgr, root) = self.mounted()?;
        volume_mgr
            .delete_file_in_dir(root, name)
            .map_err(map_error)
    }
}

/// Collapse driver errors into the storage error set
pub fn map_error<E: core::fmt::Debug>(error: Error<E>) -> StorageError {
    match error {
        Error::NotFound => StorageError::NotFound,
        Error::FilenameError(_) => StorageError::InvalidName,
        Error::NotEnoughSpace => StorageError::Full,
        Error::TooManyOpenFiles => StorageError::TooManyOpen,
        _ => StorageError::Io,
    }
}
