//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns both drivers; [`adapters::hardware`](crate::adapters::hardware)
//! exposes it to the domain as a [`SensorPort`](crate::app::ports::SensorPort).

pub mod dht22;
pub mod sgp30;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::info;

use crate::error::SensorError;
use dht22::Dht22;
use sgp30::Sgp30;

/// Aggregates the climate and air-quality drivers.
pub struct SensorHub<I2C, D> {
    pub sgp30: Sgp30<I2C, D>,
    pub dht22: Dht22,
}

impl<I2C: I2c, D: DelayNs> SensorHub<I2C, D> {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(sgp30: Sgp30<I2C, D>, dht22: Dht22) -> Self {
        Self { sgp30, dht22 }
    }

    /// Presence check plus IAQ algorithm start.  Must succeed before the
    /// loop runs; `main` wraps it in bounded retries.
    pub fn init(&mut self) -> Result<(), SensorError> {
        let serial = self.sgp30.serial()?;
        info!("SensorHub: SGP30 serial {:012x}", serial);
        self.sgp30.iaq_init()
    }
}
