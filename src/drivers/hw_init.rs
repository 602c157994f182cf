//! One-shot hardware peripheral initialization.
//!
//! Configures the alert LED output, the DHT22 data line and the SPIFFS
//! partition holding the data files, using raw ESP-IDF sys calls.  Also
//! exposes the small GPIO / timing helpers the bit-banged drivers use.
//! The I²C bus is owned by `esp_idf_svc::hal`'s `I2cDriver` and set up in
//! `main`.
//!
//! Host builds get no-op stubs.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    StorageMountFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::StorageMountFailed(rc) => write!(f, "SPIFFS mount failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

/// Mount point of the data partition.
pub const STORAGE_BASE_PATH: &str = "/spiffs";

#[cfg(target_os = "espidf")]
pub fn init_peripherals(alert_active_low: bool) -> Result<(), HwInitError> {
    // SAFETY: Called from main() before the loop starts; single-threaded.
    unsafe {
        init_alert_led(alert_active_low)?;
        init_dht_line()?;
    }
    info!("hw_init: GPIO configured (led={}, dht22={})", pins::ALERT_LED_GPIO, pins::DHT22_DATA_GPIO);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(_alert_active_low: bool) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_alert_led(active_low: bool) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::ALERT_LED_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    // Indicator starts dark.
    unsafe { gpio_set_level(pins::ALERT_LED_GPIO, u32::from(active_low)) };
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_dht_line() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::DHT22_DATA_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    // Idle high.
    unsafe { gpio_set_level(pins::DHT22_DATA_GPIO, 1) };
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: register read on an already-configured pin; main context only.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: pin was configured as an output in init_peripherals().
    unsafe { gpio_set_level(pin, u32::from(high)); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

/// Switch a bidirectional line to drive mode.
#[cfg(target_os = "espidf")]
pub fn gpio_set_output(pin: i32) {
    // SAFETY: direction change on a pin owned by the calling driver.
    unsafe { gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD); }
}

/// Release a bidirectional line so the device can drive it.
#[cfg(target_os = "espidf")]
pub fn gpio_set_input(pin: i32) {
    // SAFETY: direction change on a pin owned by the calling driver.
    unsafe { gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT); }
}

// ── Timing ────────────────────────────────────────────────────

/// Busy-wait for `us` microseconds.
#[cfg(target_os = "espidf")]
pub fn delay_us(us: u32) {
    // SAFETY: ROM busy-wait, no shared state.
    unsafe { esp_rom_delay_us(us) };
}

/// Microseconds since boot.
#[cfg(target_os = "espidf")]
pub fn micros() -> u64 {
    // SAFETY: esp_timer_get_time is a read of the monotonic system timer.
    (unsafe { esp_timer_get_time() }) as u64
}

// ── Data partition ────────────────────────────────────────────

/// Mount the SPIFFS data partition at [`STORAGE_BASE_PATH`], formatting
/// it on first boot.
#[cfg(target_os = "espidf")]
pub fn mount_storage() -> Result<(), HwInitError> {
    let conf = esp_vfs_spiffs_conf_t {
        base_path: c"/spiffs".as_ptr(),
        partition_label: core::ptr::null(),
        max_files: 4,
        format_if_mount_failed: true,
    };
    // SAFETY: conf outlives the call; the VFS copies the strings it keeps.
    let ret = unsafe { esp_vfs_spiffs_register(&conf) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::StorageMountFailed(ret));
    }
    info!("hw_init: SPIFFS mounted at {}", STORAGE_BASE_PATH);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn mount_storage() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): storage mount skipped");
    Ok(())
}
