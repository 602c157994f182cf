//! File-backed calibration store.
//!
//! Implements [`CalibrationStore`] as a small JSON document on the data
//! partition:
//!
//! ```text
//! {"co2eq_base":35187,"tvoc_base":36421}
//! ```
//!
//! Writes go to a `.tmp` sibling which is synced and then renamed over the
//! target, so a power cut leaves either the old or the new document.  Some
//! flash filesystems refuse to rename onto an existing name; there the
//! target is removed first and [`restore`](CalibrationStore::restore)
//! recovers from a complete orphaned `.tmp` if the cut lands in between.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::app::model::CalibrationBaseline;
use crate::app::ports::{CalibrationStore, StorageError};

pub struct FileCalibrationStore {
    path: PathBuf,
    tmp_path: PathBuf,
}

impl FileCalibrationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        Self {
            path,
            tmp_path: PathBuf::from(tmp),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_tmp(&self, bytes: &[u8]) -> io::Result<()> {
        let mut f = fs::File::create(&self.tmp_path)?;
        f.write_all(bytes)?;
        f.flush()?;
        f.sync_all()
    }

    fn replace_target(&self) -> io::Result<()> {
        if fs::rename(&self.tmp_path, &self.path).is_ok() {
            return Ok(());
        }
        debug!("FileCalibrationStore: rename-over refused, removing target first");
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::rename(&self.tmp_path, &self.path)
    }
}

fn read_baseline(path: &Path) -> Result<CalibrationBaseline, StorageError> {
    let bytes = fs::read(path).map_err(|_| StorageError::Unavailable)?;
    serde_json::from_slice(&bytes).map_err(|_| StorageError::Corrupted)
}

impl CalibrationStore for FileCalibrationStore {
    fn restore(&mut self) -> Result<CalibrationBaseline, StorageError> {
        match read_baseline(&self.path) {
            Ok(b) => {
                info!("FileCalibrationStore: loaded {:?} from {}", b, self.path.display());
                Ok(b)
            }
            Err(StorageError::Unavailable) => {
                // Interrupted replace: the new document is complete in .tmp.
                let b = read_baseline(&self.tmp_path).map_err(|_| StorageError::Unavailable)?;
                warn!("FileCalibrationStore: recovered baseline from {}", self.tmp_path.display());
                if let Err(e) = fs::rename(&self.tmp_path, &self.path) {
                    warn!("FileCalibrationStore: could not promote recovered file: {}", e);
                }
                Ok(b)
            }
            Err(e) => Err(e),
        }
    }

    fn checkpoint(&mut self, baseline: CalibrationBaseline) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(&baseline).map_err(|_| StorageError::WriteFailed)?;
        self.write_tmp(&bytes).map_err(|e| {
            warn!("FileCalibrationStore: temp write failed: {}", e);
            StorageError::WriteFailed
        })?;
        self.replace_target().map_err(|e| {
            warn!("FileCalibrationStore: replace failed: {}", e);
            StorageError::WriteFailed
        })?;
        debug!("FileCalibrationStore: {} bytes committed", bytes.len());
        Ok(())
    }
}
