//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SchedulingLoop (domain)
//! ```
//!
//! Driven adapters (sensors, indicator, stores, event sinks) implement
//! these traits.  The [`SchedulingLoop`](super::service::SchedulingLoop)
//! owns one of each, injected at construction, so the domain core never
//! touches hardware or the filesystem directly.

pub use crate::error::{SensorError, StorageError};

use super::model::{AirQualityReading, CalibrationBaseline, ClimateReading, MeasurementRecord};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the climate and air-quality sensors.
pub trait SensorPort {
    /// Temperature and relative humidity.
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError>;

    /// CO2-equivalent and TVOC.
    fn read_air_quality(&mut self) -> Result<AirQualityReading, SensorError>;

    /// Hand a previously persisted baseline back to the sensor.
    fn apply_calibration(&mut self, baseline: CalibrationBaseline) -> Result<(), SensorError>;

    /// The sensor's current internal baseline.
    fn current_calibration(&mut self) -> Result<CalibrationBaseline, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Alert indicator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// The single visual alert.
pub trait AlertIndicator {
    /// Drive the indicator.  Idempotent.
    fn set_alert(&mut self, active: bool);

    /// Current physical state of the indicator.
    fn is_alert(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Calibration store (driven adapter: domain ↔ flash)
// ───────────────────────────────────────────────────────────────

/// Durable home of the [`CalibrationBaseline`].
///
/// `checkpoint` MUST leave either the old or the new complete value on
/// power loss, never a truncated one.
pub trait CalibrationStore {
    /// Load the last persisted baseline.
    ///
    /// [`StorageError::Unavailable`] on first boot,
    /// [`StorageError::Corrupted`] if the stored value does not parse.
    fn restore(&mut self) -> Result<CalibrationBaseline, StorageError>;

    /// Overwrite the persisted baseline.
    fn checkpoint(&mut self, baseline: CalibrationBaseline) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Measurement sink (driven adapter: domain → flash)
// ───────────────────────────────────────────────────────────────

/// Append-only measurement log.  Never rewrites earlier entries.
pub trait MeasurementSink {
    fn append(&mut self, record: &MeasurementRecord) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → diagnostic log)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
