//! Domain value types exchanged across the port boundary.

use serde::{Deserialize, Serialize};

/// DHT22 output for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    /// Degrees Celsius.
    pub temperature: f32,
    /// Relative humidity, percent.
    pub humidity: f32,
}

/// SGP30 output for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AirQualityReading {
    /// CO2-equivalent, ppm.
    pub co2eq: u16,
    /// Total VOC, ppb.
    pub tvoc: u16,
}

/// SGP30 IAQ baseline, persisted across power cycles.
///
/// `Default` is `{0, 0}`: the documented fallback when nothing has been
/// stored yet.  The sensor is never told to adopt it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationBaseline {
    pub co2eq_base: u16,
    pub tvoc_base: u16,
}

impl CalibrationBaseline {
    pub const fn new(co2eq_base: u16, tvoc_base: u16) -> Self {
        Self {
            co2eq_base,
            tvoc_base,
        }
    }

    /// `true` for the `{0, 0}` fallback value.
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}

/// One line of the measurement log.  Append order is time order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub temperature: f32,
    pub humidity: f32,
    pub co2eq: u16,
    pub tvoc: u16,
}

impl MeasurementRecord {
    pub fn new(climate: ClimateReading, air: AirQualityReading) -> Self {
        Self {
            temperature: climate.temperature,
            humidity: climate.humidity,
            co2eq: air.co2eq,
            tvoc: air.tvoc,
        }
    }
}
