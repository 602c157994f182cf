//! Single-GPIO alert LED.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LED GPIO configured by hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;

pub struct AlertLed {
    gpio: i32,
    active_low: bool,
    lit: bool,
}

impl AlertLed {
    /// Take the pin and force the LED dark.
    pub fn new(gpio: i32, active_low: bool) -> Self {
        let mut led = Self {
            gpio,
            active_low,
            lit: true,
        };
        led.set(false);
        led
    }

    pub fn set(&mut self, lit: bool) {
        hw_init::gpio_write(self.gpio, lit != self.active_low);
        self.lit = lit;
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
