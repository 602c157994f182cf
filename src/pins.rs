//! GPIO / peripheral pin assignments for the monitor board (ESP32 DevKit).
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// I²C bus (SGP30 VOC / CO2eq sensor)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
/// Standard-mode I²C; the SGP30 supports up to 400 kHz.
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// DHT22 single-wire temperature / humidity sensor
// ---------------------------------------------------------------------------

/// Open-drain data line with pull-up.
pub const DHT22_DATA_GPIO: i32 = 0;

// ---------------------------------------------------------------------------
// Alert indicator
// ---------------------------------------------------------------------------

/// On-board LED.  Wired active-low on the reference board.
pub const ALERT_LED_GPIO: i32 = 5;
