//! Air-quality monitor firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  SensorHub      AlertLed        FileCalibrationStore         │
//! │  (SensorPort)   (AlertIndicator)(CalibrationStore)           │
//! │  JsonLinesSink  LogEventSink    SystemDelay                  │
//! │  (MeasurementSink)(EventSink)   (DelayNs)                    │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ─────────────────       │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │          SchedulingLoop (pure logic)               │      │
//! │  │  alert policy · CheckpointTimer                    │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::units::Hertz;

use aqmon::adapters::calibration_file::FileCalibrationStore;
use aqmon::adapters::log_sink::LogEventSink;
use aqmon::adapters::measurement_log::JsonLinesSink;
use aqmon::adapters::time::SystemDelay;
use aqmon::app::service::{SchedulingLoop, init_with_retries};
use aqmon::config::MonitorConfig;
use aqmon::drivers::alert_led::AlertLed;
use aqmon::drivers::hw_init;
use aqmon::pins;
use aqmon::sensors::SensorHub;
use aqmon::sensors::dht22::Dht22;
use aqmon::sensors::sgp30::Sgp30;

// The I2C pins below are taken by field name; keep them in step with pins.rs.
const _: () = assert!(pins::I2C_SDA_GPIO == 21 && pins::I2C_SCL_GPIO == 22);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  aqmon v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = MonitorConfig::default();
    config.validate()?;
    let mut delay = SystemDelay::new();

    // ── 3. GPIO and data partition ────────────────────────────
    init_with_retries(config.init_attempts, "gpio", &mut delay, || {
        hw_init::init_peripherals(config.alert_active_low)
    })?;
    init_with_retries(config.init_attempts, "spiffs", &mut delay, hw_init::mount_storage)?;

    // ── 4. Sensors ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let i2c_config = I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ));
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &i2c_config,
    )?;
    let mut hub = SensorHub::new(
        Sgp30::new(i2c, SystemDelay::new()),
        Dht22::new(pins::DHT22_DATA_GPIO),
    );
    init_with_retries(config.init_attempts, "sensors", &mut delay, || hub.init())?;

    // ── 5. Adapters ───────────────────────────────────────────
    let led = AlertLed::new(pins::ALERT_LED_GPIO, config.alert_active_low);
    let store = FileCalibrationStore::new(config.calibration_path.as_str());
    let log = JsonLinesSink::new(
        config.measurement_log_path.as_str(),
        config.measurement_log_max_bytes,
    );
    info!(
        "Data files: calibration={} log={}",
        store.path().display(),
        log.path().display()
    );

    // ── 6. Loop ───────────────────────────────────────────────
    let mut monitor = SchedulingLoop::new(
        &config,
        hub,
        led,
        store,
        log,
        LogEventSink::new(),
        delay,
    );
    monitor.restore_calibration();
    monitor.run()
}
