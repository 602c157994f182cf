//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter            | Implements        | Connects to                 |
//! |--------------------|-------------------|-----------------------------|
//! | `calibration_file` | CalibrationStore  | JSON file on SPIFFS         |
//! | `hardware`         | SensorPort        | SGP30 (I2C), DHT22 (GPIO)   |
//! |                    | AlertIndicator    | Alert LED GPIO              |
//! | `log_sink`         | EventSink         | Serial log output           |
//! | `measurement_log`  | MeasurementSink   | JSON-lines file on SPIFFS   |
//! | `time`             | DelayNs           | FreeRTOS delay / std sleep  |

pub mod calibration_file;
pub mod hardware;
pub mod log_sink;
pub mod measurement_log;
pub mod time;
