//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART / USB-CDC in production).  Measurement lines keep the
//! tab-separated console layout operators already grep for.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { alert } => {
                info!("START | alert={}", if *alert { "ON" } else { "OFF" });
            }
            AppEvent::BaselineRestored(b) => {
                info!(
                    "CALIB | restored co2eq_base=0x{:04x} tvoc_base=0x{:04x}",
                    b.co2eq_base, b.tvoc_base
                );
            }
            AppEvent::BaselineFallback(e) => {
                warn!("CALIB | no stored baseline ({}), sensor keeps its own", e);
            }
            AppEvent::BaselineApplyFailed(e) => {
                warn!("CALIB | sensor rejected restored baseline: {}", e);
            }
            AppEvent::Measurement(r) => {
                info!(
                    "temp = {:5.1} \u{00b0}C \t humi = {:5.1}% \t CO2e = {} ppm \t TVOC = {} ppb",
                    r.temperature, r.humidity, r.co2eq, r.tvoc
                );
            }
            AppEvent::AlertChanged { active, co2eq } => {
                info!(
                    "ALERT | {} at CO2e={} ppm",
                    if *active { "ON" } else { "OFF" },
                    co2eq
                );
            }
            AppEvent::SensorReadFailed(e) => {
                warn!("SENSE | read failed: {}", e);
            }
            AppEvent::CheckpointSaved(b) => {
                info!(
                    "CALIB | saved co2eq_base=0x{:04x} tvoc_base=0x{:04x}",
                    b.co2eq_base, b.tvoc_base
                );
            }
            AppEvent::CheckpointReadFailed(e) => {
                warn!("CALIB | baseline read failed at checkpoint: {}", e);
            }
            AppEvent::StorageWriteFailed {
                target,
                error: e,
                attempts,
            } => {
                error!(
                    "STORE | {:?} write failed after {} attempt(s): {}",
                    target, attempts, e
                );
            }
        }
    }
}
