//! Fuzz target: calibration file parsing
//!
//! Writes arbitrary bytes where the calibration file lives and restores
//! from it.  The store must never panic, and anything it accepts must
//! survive a checkpoint/restore cycle unchanged.
//!
//! cargo fuzz run fuzz_calibration_json

#![no_main]

use aqmon::adapters::calibration_file::FileCalibrationStore;
use aqmon::app::ports::CalibrationStore;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let dir = std::env::temp_dir().join(format!("aqmon-fuzz-{}", std::process::id()));
    let _ = std::fs::create_dir_all(&dir);
    let path = dir.join("data_file.json");
    let _ = std::fs::remove_file(dir.join("data_file.json.tmp"));
    if std::fs::write(&path, data).is_err() {
        return;
    }

    let mut store = FileCalibrationStore::new(&path);
    if let Ok(b) = store.restore() {
        store.checkpoint(b).unwrap();
        assert_eq!(store.restore().unwrap(), b);
    }
});
