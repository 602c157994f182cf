//! Indicator driver and one-shot hardware initialisation.

pub mod alert_led;
pub mod hw_init;
