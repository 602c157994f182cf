//! Unified error types for the aqmon firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level loop's error handling uniform.  All variants are `Copy` so
//! they can be passed through events and retry helpers without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned invalid data.
    Sensor(SensorError),
    /// Durable storage could not be read or written.
    Storage(StorageError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The bus transaction failed (NACK, arbitration loss, ...).
    Bus,
    /// A Sensirion word failed its CRC-8 check.
    Crc,
    /// The DHT22 frame checksum did not match.
    Checksum,
    /// The sensor did not answer within its protocol timing.
    Timeout,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "bus transaction failed"),
            Self::Crc => write!(f, "CRC mismatch"),
            Self::Checksum => write!(f, "frame checksum mismatch"),
            Self::Timeout => write!(f, "sensor timed out"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The backing file does not exist or cannot be opened (first boot).
    Unavailable,
    /// The stored value exists but failed to parse.
    Corrupted,
    /// A write, flush, sync or rename failed.
    WriteFailed,
    /// The configured size cap would be exceeded.
    Full,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Corrupted => write!(f, "stored data corrupted"),
            Self::WriteFailed => write!(f, "write failed"),
            Self::Full => write!(f, "storage full"),
        }
    }
}

impl StorageError {
    /// `false` for conditions a retry cannot change.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Full)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
