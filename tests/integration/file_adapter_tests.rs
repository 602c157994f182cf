//! Integration tests: SchedulingLoop against the file-backed adapters.
//!
//! Exercises a power cycle: one loop persists a baseline and writes the
//! measurement log, a second loop built over the same files picks the
//! baseline back up.

use std::fs;
use std::path::PathBuf;

use aqmon::adapters::calibration_file::FileCalibrationStore;
use aqmon::adapters::measurement_log::JsonLinesSink;
use aqmon::app::model::{CalibrationBaseline, MeasurementRecord};
use aqmon::app::service::SchedulingLoop;
use aqmon::config::MonitorConfig;

use crate::mock_hw::{CountingDelay, MockIndicator, MockSensor, RecordingEvents};

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("aqmon-it-{}-{}", tag, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn short_checkpoint() -> MonitorConfig {
    MonitorConfig {
        checkpoint_interval_secs: 4,
        ..MonitorConfig::default()
    }
}

#[test]
fn baseline_survives_power_cycle() {
    let dir = scratch_dir("cycle");
    let cal = dir.join("data_file.json");
    let hist = dir.join("history.json");
    let config = short_checkpoint();
    let learned = CalibrationBaseline::new(0x8d12, 0x8e34);

    // First boot: nothing stored.
    {
        let mut sensor = MockSensor::with_co2(&[450, 460]);
        sensor.baseline = learned;
        let mut lp = SchedulingLoop::new(
            &config,
            sensor,
            MockIndicator::new(false),
            FileCalibrationStore::new(&cal),
            JsonLinesSink::new(&hist, None),
            RecordingEvents::default(),
            CountingDelay::default(),
        );
        assert!(lp.restore_calibration().is_unset());
        lp.tick();
        lp.tick();
    }
    assert!(cal.exists());

    // Second boot.
    let mut lp = SchedulingLoop::new(
        &config,
        MockSensor::new(),
        MockIndicator::new(false),
        FileCalibrationStore::new(&cal),
        JsonLinesSink::new(&hist, None),
        RecordingEvents::default(),
        CountingDelay::default(),
    );
    assert_eq!(lp.restore_calibration(), learned);
    assert_eq!(lp.sensor().applied, vec![learned]);
    lp.tick();

    // Log spans both boots, in order.
    let co2: Vec<u16> = fs::read_to_string(&hist)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str::<MeasurementRecord>(l).unwrap().co2eq)
        .collect();
    assert_eq!(co2, vec![450, 460, 400]);
}

#[test]
fn full_log_does_not_stop_the_loop() {
    let dir = scratch_dir("full");
    let hist = dir.join("history.json");
    let mut lp = SchedulingLoop::new(
        &short_checkpoint(),
        MockSensor::with_co2(&[1600, 1700, 1800]),
        MockIndicator::new(false),
        FileCalibrationStore::new(dir.join("data_file.json")),
        JsonLinesSink::new(&hist, Some(1)),
        RecordingEvents::default(),
        CountingDelay::default(),
    );
    for _ in 0..3 {
        let report = lp.tick();
        assert!(!report.appended);
        assert!(report.alert);
    }
    assert!(!hist.exists());
    assert_eq!(lp.indicator().writes, vec![true]);
}
