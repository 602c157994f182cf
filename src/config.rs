//! System configuration parameters
//!
//! All tunable parameters for the monitor.  These are compile-time
//! defaults rather than runtime flags; `main` validates them once before
//! peripheral bring-up.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Minimum re-measurement interval the DHT22 tolerates.
pub const DHT22_MIN_INTERVAL_SECS: u32 = 2;

/// Maximum length of an on-flash path.
pub const MAX_PATH_LEN: usize = 64;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    // --- Timing ---
    /// Nominal duration of one measurement tick (seconds)
    pub tick_interval_secs: u32,
    /// Calibration checkpoint cadence (seconds); exact multiple of the tick
    pub checkpoint_interval_secs: u32,

    // --- Alert ---
    /// CO2-equivalent level (ppm) at or above which the alert is raised
    pub co2eq_warning_level: u16,
    /// Indicator GPIO is driven LOW to light the LED
    pub alert_active_low: bool,

    // --- Storage ---
    /// Calibration baseline file
    pub calibration_path: String<MAX_PATH_LEN>,
    /// Append-only measurement log
    pub measurement_log_path: String<MAX_PATH_LEN>,
    /// Optional size cap for the measurement log (bytes)
    pub measurement_log_max_bytes: Option<u64>,
    /// Attempts per checkpoint / append before giving up on that write
    pub storage_retry_attempts: u8,

    // --- Startup ---
    /// Attempts at peripheral and sensor bring-up before aborting
    pub init_attempts: u8,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_interval_secs: 2,          // DHT22 minimum
            checkpoint_interval_secs: 3600, // 1/hour

            // Alert
            co2eq_warning_level: 1500,
            alert_active_low: true,

            // Storage
            calibration_path: path("/spiffs/data_file.json"),
            measurement_log_path: path("/spiffs/history.json"),
            measurement_log_max_bytes: None,
            storage_retry_attempts: 3,

            // Startup
            init_attempts: 3,
        }
    }
}

impl MonitorConfig {
    /// Number of ticks between two checkpoints.
    pub fn ticks_per_checkpoint(&self) -> u32 {
        self.checkpoint_interval_secs / self.tick_interval_secs.max(1)
    }

    /// Reject configurations the scheduling loop cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_secs == 0 {
            return Err(Error::Config("tick_interval_secs must be > 0"));
        }
        if self.tick_interval_secs < DHT22_MIN_INTERVAL_SECS {
            return Err(Error::Config(
                "tick_interval_secs must be >= 2 (DHT22 re-measurement limit)",
            ));
        }
        if self.checkpoint_interval_secs == 0 {
            return Err(Error::Config("checkpoint_interval_secs must be > 0"));
        }
        if self.checkpoint_interval_secs % self.tick_interval_secs != 0 {
            return Err(Error::Config(
                "checkpoint_interval_secs must be a multiple of tick_interval_secs",
            ));
        }
        if self.storage_retry_attempts == 0 {
            return Err(Error::Config("storage_retry_attempts must be >= 1"));
        }
        if self.init_attempts == 0 {
            return Err(Error::Config("init_attempts must be >= 1"));
        }
        if self.calibration_path.is_empty() || self.measurement_log_path.is_empty() {
            return Err(Error::Config("data file paths must not be empty"));
        }
        Ok(())
    }
}

/// Build a fixed-capacity path, truncating anything past [`MAX_PATH_LEN`].
pub fn path(s: &str) -> String<MAX_PATH_LEN> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
