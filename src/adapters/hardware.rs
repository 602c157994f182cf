//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! [`SensorHub`] becomes the [`SensorPort`] and [`AlertLed`] the
//! [`AlertIndicator`].  This is the only module in the system that
//! touches actual sensors; on non-espidf targets the drivers underneath
//! use cfg-gated simulation stubs.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::app::model::{AirQualityReading, CalibrationBaseline, ClimateReading};
use crate::app::ports::{AlertIndicator, SensorError, SensorPort};
use crate::drivers::alert_led::AlertLed;
use crate::sensors::SensorHub;
use crate::sensors::sgp30::IaqBaseline;

// ── SensorPort implementation ─────────────────────────────────

impl<I2C: I2c, D: DelayNs> SensorPort for SensorHub<I2C, D> {
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError> {
        let r = self.dht22.read()?;
        Ok(ClimateReading {
            temperature: r.temperature_c,
            humidity: r.humidity_pct,
        })
    }

    fn read_air_quality(&mut self) -> Result<AirQualityReading, SensorError> {
        let m = self.sgp30.measure_iaq()?;
        Ok(AirQualityReading {
            co2eq: m.co2eq_ppm,
            tvoc: m.tvoc_ppb,
        })
    }

    fn apply_calibration(&mut self, baseline: CalibrationBaseline) -> Result<(), SensorError> {
        self.sgp30.set_iaq_baseline(IaqBaseline {
            co2eq: baseline.co2eq_base,
            tvoc: baseline.tvoc_base,
        })
    }

    fn current_calibration(&mut self) -> Result<CalibrationBaseline, SensorError> {
        let b = self.sgp30.get_iaq_baseline()?;
        Ok(CalibrationBaseline::new(b.co2eq, b.tvoc))
    }
}

// ── AlertIndicator implementation ─────────────────────────────

impl AlertIndicator for AlertLed {
    fn set_alert(&mut self, active: bool) {
        if self.is_lit() != active {
            self.set(active);
        }
    }

    fn is_alert(&self) -> bool {
        self.is_lit()
    }
}
