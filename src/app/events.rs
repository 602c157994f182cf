//! Outbound application events.
//!
//! The [`SchedulingLoop`](super::service::SchedulingLoop) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  The log
//! adapter turns them into diagnostic log lines.

use crate::error::{SensorError, StorageError};

use super::model::{CalibrationBaseline, MeasurementRecord};

/// Which durable write gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageTarget {
    Calibration,
    MeasurementLog,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The loop is about to run its first tick.
    Started { alert: bool },

    /// A baseline was restored from flash and handed to the sensor.
    BaselineRestored(CalibrationBaseline),

    /// No usable baseline on flash; running on the `{0,0}` fallback.
    BaselineFallback(StorageError),

    /// The sensor refused the restored baseline.
    BaselineApplyFailed(SensorError),

    /// One tick's measurement.
    Measurement(MeasurementRecord),

    /// The alert indicator changed state.
    AlertChanged { active: bool, co2eq: u16 },

    /// A sensor read failed; the tick was skipped.
    SensorReadFailed(SensorError),

    /// The baseline was persisted.
    CheckpointSaved(CalibrationBaseline),

    /// The baseline could not be read from the sensor at a checkpoint.
    CheckpointReadFailed(SensorError),

    /// A durable write failed after every retry.
    StorageWriteFailed {
        target: StorageTarget,
        error: StorageError,
        attempts: u8,
    },
}
