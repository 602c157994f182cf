//! Append-only measurement log.
//!
//! Implements [`MeasurementSink`] as JSON lines, one record per tick:
//!
//! ```text
//! {"temperature":21.5,"humidity":40.0,"co2eq":612,"tvoc":35}
//! ```
//!
//! The file is opened in append mode for every write and synced before
//! returning, so earlier entries are never rewritten and a power cut can
//! at worst lose the line being written.  A failed write is truncated
//! back to the previous length so a retry never lands on a fragment.
//! Growth is unbounded unless a byte cap is configured, in which case
//! appends past the cap are refused.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::warn;

use crate::app::model::MeasurementRecord;
use crate::app::ports::{MeasurementSink, StorageError};

pub struct JsonLinesSink {
    path: PathBuf,
    max_bytes: Option<u64>,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>, max_bytes: Option<u64>) -> Self {
        Self {
            path: path.into(),
            max_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn current_len(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        append_line(&mut f, line)
    }
}

/// The file operations an append needs.
trait LogFile: Write {
    fn len(&self) -> io::Result<u64>;
    fn truncate(&mut self, len: u64) -> io::Result<()>;
    fn sync(&mut self) -> io::Result<()>;
}

impl LogFile for File {
    fn len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }
}

/// Write `line` in full or leave the file at its previous length.
fn append_line<F: LogFile>(f: &mut F, line: &[u8]) -> io::Result<()> {
    let prev_len = f.len()?;
    let res = f.write_all(line).and_then(|()| f.flush()).and_then(|()| f.sync());
    if let Err(e) = res {
        if let Err(te) = f.truncate(prev_len) {
            warn!("JsonLinesSink: rollback to {} bytes failed: {}", prev_len, te);
        }
        return Err(e);
    }
    Ok(())
}

impl MeasurementSink for JsonLinesSink {
    fn append(&mut self, record: &MeasurementRecord) -> Result<(), StorageError> {
        let mut line = serde_json::to_vec(record).map_err(|_| StorageError::WriteFailed)?;
        line.push(b'\n');

        if let Some(cap) = self.max_bytes {
            if self.current_len() + line.len() as u64 > cap {
                return Err(StorageError::Full);
            }
        }

        self.write_line(&line).map_err(|e| {
            warn!("JsonLinesSink: append to {} failed: {}", self.path.display(), e);
            StorageError::WriteFailed
        })
    }
}
