//! DHT22 (AM2302) single-wire temperature / humidity sensor.
//!
//! The host pulls the data line low for >1 ms, releases it, and the sensor
//! answers with an 80 µs low / 80 µs high preamble followed by 40 bits.
//! Each bit is a ~50 µs low followed by a high pulse of ~27 µs (0) or
//! ~70 µs (1).
//!
//! Frame: `RH_hi RH_lo T_hi T_lo checksum`, both values in tenths, the
//! temperature sign in bit 15, checksum = low byte of the sum of the
//! first four bytes.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the line through hw_init GPIO helpers.
//! On host/test: decodes a frame injected with [`Dht22::sim_set_frame`].

use crate::error::SensorError;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

/// One decoded DHT22 sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dht22Reading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Decode and range-check a raw 5-byte frame.
pub fn decode_frame(frame: [u8; 5]) -> Result<Dht22Reading, SensorError> {
    let sum = frame[..4]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b));
    if sum != frame[4] {
        return Err(SensorError::Checksum);
    }

    let rh_raw = u16::from_be_bytes([frame[0], frame[1]]);
    let t_raw = u16::from_be_bytes([frame[2], frame[3]]);
    let magnitude = f32::from(t_raw & 0x7FFF) / 10.0;
    let temperature_c = if t_raw & 0x8000 != 0 {
        -magnitude
    } else {
        magnitude
    };
    let humidity_pct = f32::from(rh_raw) / 10.0;

    if !(0.0..=100.0).contains(&humidity_pct) || !(-40.0..=80.0).contains(&temperature_c) {
        return Err(SensorError::OutOfRange);
    }

    Ok(Dht22Reading {
        temperature_c,
        humidity_pct,
    })
}

pub struct Dht22 {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    gpio: i32,
    #[cfg(not(target_os = "espidf"))]
    sim_frame: Option<[u8; 5]>,
}

impl Dht22 {
    pub fn new(gpio: i32) -> Self {
        Self {
            gpio,
            #[cfg(not(target_os = "espidf"))]
            sim_frame: None,
        }
    }

    pub fn read(&mut self) -> Result<Dht22Reading, SensorError> {
        let frame = self.read_frame()?;
        decode_frame(frame)
    }

    /// Inject the next frame the simulated sensor returns; `None` makes
    /// the sensor stop answering.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_frame(&mut self, frame: Option<[u8; 5]>) {
        self.sim_frame = frame;
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_frame(&mut self) -> Result<[u8; 5], SensorError> {
        self.sim_frame.ok_or(SensorError::Timeout)
    }

    #[cfg(target_os = "espidf")]
    fn read_frame(&mut self) -> Result<[u8; 5], SensorError> {
        let pin = self.gpio;

        // Start signal.
        hw_init::gpio_set_output(pin);
        hw_init::gpio_write(pin, false);
        hw_init::delay_us(1_100);
        hw_init::gpio_write(pin, true);
        hw_init::delay_us(30);
        hw_init::gpio_set_input(pin);

        // Preamble: low ~80 µs, high ~80 µs.
        wait_while(pin, true, 100)?;
        wait_while(pin, false, 100)?;
        wait_while(pin, true, 100)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            wait_while(pin, false, 70)?;
            let high_us = wait_while(pin, true, 100)?;
            if high_us > 40 {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Ok(frame)
    }
}

/// Spin while the line reads `level`; returns the elapsed microseconds.
#[cfg(target_os = "espidf")]
fn wait_while(pin: i32, level: bool, timeout_us: u64) -> Result<u64, SensorError> {
    let start = hw_init::micros();
    while hw_init::gpio_read(pin) == level {
        let elapsed = hw_init::micros().saturating_sub(start);
        if elapsed > timeout_us {
            return Err(SensorError::Timeout);
        }
    }
    Ok(hw_init::micros().saturating_sub(start))
}
