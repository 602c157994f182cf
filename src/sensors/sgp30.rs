//! Sensirion SGP30 multi-pixel gas sensor (TVOC / CO2eq).
//!
//! Generic over any `embedded-hal` 1.0 I²C bus and blocking delay, so the
//! same driver runs against the ESP-IDF `I2cDriver` on target and against
//! a scripted bus in host tests.
//!
//! Every 16-bit word on the wire is followed by a CRC-8 (poly 0x31,
//! init 0xFF).  The IAQ algorithm keeps its baseline in sensor RAM; it is
//! lost on power-down unless read back and re-applied by the host.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::error::SensorError;

/// Fixed 7-bit bus address.
pub const SGP30_ADDR: u8 = 0x58;

const CMD_IAQ_INIT: [u8; 2] = [0x20, 0x03];
const CMD_MEASURE_IAQ: [u8; 2] = [0x20, 0x08];
const CMD_GET_IAQ_BASELINE: [u8; 2] = [0x20, 0x15];
const CMD_SET_IAQ_BASELINE: [u8; 2] = [0x20, 0x1E];
const CMD_GET_SERIAL_ID: [u8; 2] = [0x36, 0x82];

// Max command durations from the datasheet (ms).
const IAQ_INIT_MS: u32 = 10;
const MEASURE_IAQ_MS: u32 = 12;
const BASELINE_MS: u32 = 10;
const SERIAL_ID_MS: u32 = 1;

/// Sensirion CRC-8 over one data word.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0xFF;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x31
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Raw IAQ measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IaqMeasurement {
    pub co2eq_ppm: u16,
    pub tvoc_ppb: u16,
}

/// IAQ baseline words as the sensor reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IaqBaseline {
    pub co2eq: u16,
    pub tvoc: u16,
}

pub struct Sgp30<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> Sgp30<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: SGP30_ADDR,
        }
    }

    /// 48-bit serial number; doubles as a presence check at boot.
    pub fn serial(&mut self) -> Result<u64, SensorError> {
        let words = self.read_words::<3>(CMD_GET_SERIAL_ID, SERIAL_ID_MS)?;
        Ok(words
            .iter()
            .fold(0u64, |acc, &w| (acc << 16) | u64::from(w)))
    }

    /// Start the IAQ algorithm.  Readings are fixed at 400 ppm / 0 ppb for
    /// the first ~15 s afterwards.
    pub fn iaq_init(&mut self) -> Result<(), SensorError> {
        self.write_command(&CMD_IAQ_INIT)?;
        self.delay.delay_ms(IAQ_INIT_MS);
        Ok(())
    }

    pub fn measure_iaq(&mut self) -> Result<IaqMeasurement, SensorError> {
        let [co2eq_ppm, tvoc_ppb] = self.read_words::<2>(CMD_MEASURE_IAQ, MEASURE_IAQ_MS)?;
        Ok(IaqMeasurement {
            co2eq_ppm,
            tvoc_ppb,
        })
    }

    pub fn get_iaq_baseline(&mut self) -> Result<IaqBaseline, SensorError> {
        let [co2eq, tvoc] = self.read_words::<2>(CMD_GET_IAQ_BASELINE, BASELINE_MS)?;
        Ok(IaqBaseline { co2eq, tvoc })
    }

    /// Restore a baseline.  The sensor expects the TVOC word first.
    pub fn set_iaq_baseline(&mut self, baseline: IaqBaseline) -> Result<(), SensorError> {
        let mut frame = [0u8; 8];
        frame[..2].copy_from_slice(&CMD_SET_IAQ_BASELINE);
        encode_word(baseline.tvoc, &mut frame[2..5]);
        encode_word(baseline.co2eq, &mut frame[5..8]);
        self.write_command(&frame)?;
        self.delay.delay_ms(BASELINE_MS);
        Ok(())
    }

    pub fn bus(&self) -> &I2C {
        &self.i2c
    }

    /// Give the bus back (tests, re-initialisation).
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn write_command(&mut self, bytes: &[u8]) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, bytes)
            .map_err(|_| SensorError::Bus)
    }

    fn read_words<const N: usize>(
        &mut self,
        cmd: [u8; 2],
        wait_ms: u32,
    ) -> Result<[u16; N], SensorError> {
        self.write_command(&cmd)?;
        self.delay.delay_ms(wait_ms);

        // Largest response is the 3-word serial id.
        let mut buf = [0u8; 9];
        let raw = &mut buf[..N * 3];
        self.i2c
            .read(self.address, raw)
            .map_err(|_| SensorError::Bus)?;

        let mut words = [0u16; N];
        for (word, chunk) in words.iter_mut().zip(raw.chunks_exact(3)) {
            *word = decode_word(chunk)?;
        }
        Ok(words)
    }
}

fn encode_word(word: u16, out: &mut [u8]) {
    let bytes = word.to_be_bytes();
    out[0] = bytes[0];
    out[1] = bytes[1];
    out[2] = crc8(&bytes);
}

fn decode_word(chunk: &[u8]) -> Result<u16, SensorError> {
    if crc8(&chunk[..2]) != chunk[2] {
        return Err(SensorError::Crc);
    }
    Ok(u16::from_be_bytes([chunk[0], chunk[1]]))
}
