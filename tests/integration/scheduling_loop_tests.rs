//! Integration tests: SchedulingLoop → alert, measurement log, checkpoint.

use aqmon::app::events::{AppEvent, StorageTarget};
use aqmon::app::model::CalibrationBaseline;
use aqmon::app::ports::{SensorError, StorageError};
use aqmon::app::service::CheckpointOutcome;
use aqmon::config::MonitorConfig;

use crate::mock_hw::{MemoryStore, MockIndicator, MockSensor, make_loop, make_loop_with};

// ── Alert behaviour ──────────────────────────────────────────

#[test]
fn alert_follows_co2_sequence() {
    let mut lp = make_loop(MockSensor::with_co2(&[1200, 1600, 1700, 1400]), MemoryStore::empty());
    lp.restore_calibration();

    let alerts: Vec<bool> = (0..4).map(|_| lp.tick().alert).collect();

    assert_eq!(alerts, vec![false, true, true, false]);
    assert_eq!(lp.sink().records.len(), 4);
    // One write to light, one to clear.
    assert_eq!(lp.indicator().writes, vec![true, false]);
}

#[test]
fn threshold_is_inclusive() {
    let mut lp = make_loop(MockSensor::with_co2(&[1499, 1500]), MemoryStore::empty());
    assert!(!lp.tick().alert);
    assert!(lp.tick().alert);
}

#[test]
fn indicator_not_rewritten_while_state_holds() {
    let mut lp = make_loop(
        MockSensor::with_co2(&[1600, 1800, 2000, 1900, 1700]),
        MemoryStore::empty(),
    );
    for _ in 0..5 {
        lp.tick();
    }
    assert_eq!(lp.indicator().writes, vec![true]);
    assert_eq!(
        lp.events().count(|e| matches!(e, AppEvent::AlertChanged { .. })),
        1
    );
}

#[test]
fn initial_state_taken_from_indicator() {
    let mut lp = make_loop_with(
        &MonitorConfig::default(),
        MockSensor::with_co2(&[500]),
        MockIndicator::new(true),
        MemoryStore::empty(),
    );
    assert!(lp.alert());
    let report = lp.tick();
    assert!(report.alert_changed);
    assert!(!report.alert);
    assert_eq!(lp.indicator().writes, vec![false]);
}

#[test]
fn repeated_reading_writes_indicator_once() {
    let mut lp = make_loop(MockSensor::new(), MemoryStore::empty());
    assert!(lp.evaluate_alert(1600));
    assert!(!lp.evaluate_alert(1600));
    assert!(lp.alert());
    assert_eq!(lp.indicator().writes, vec![true]);

    assert!(lp.evaluate_alert(900));
    assert!(!lp.evaluate_alert(900));
    assert_eq!(lp.indicator().writes, vec![true, false]);
}

#[test]
fn custom_threshold_is_honoured() {
    let config = MonitorConfig {
        co2eq_warning_level: 800,
        ..MonitorConfig::default()
    };
    let mut lp = make_loop_with(
        &config,
        MockSensor::with_co2(&[799, 800]),
        MockIndicator::new(false),
        MemoryStore::empty(),
    );
    assert!(!lp.tick().alert);
    assert!(lp.tick().alert);
}

// ── Measurement log ──────────────────────────────────────────

#[test]
fn records_combine_both_sensors() {
    let mut sensor = MockSensor::with_co2(&[950]);
    sensor.tvoc = 77;
    let mut lp = make_loop(sensor, MemoryStore::empty());
    let report = lp.tick();

    let rec = report.record.expect("measurement");
    assert!(report.appended);
    assert_eq!(rec.co2eq, 950);
    assert_eq!(rec.tvoc, 77);
    assert!((rec.temperature - 21.5).abs() < f32::EPSILON);
    assert!((rec.humidity - 40.0).abs() < f32::EPSILON);
    assert_eq!(lp.sink().records, vec![rec]);
}

#[test]
fn log_failure_is_retried_then_reported_and_loop_continues() {
    let mut lp = make_loop(MockSensor::with_co2(&[1600, 400]), MemoryStore::empty());
    lp.sink_mut().fail_with = Some(StorageError::WriteFailed);

    let report = lp.tick();
    assert!(!report.appended);
    // Alert evaluation still happens on a failed append.
    assert!(report.alert);
    assert_eq!(lp.sink().attempts, 3);
    assert!(lp.events().events.iter().any(|e| matches!(
        e,
        AppEvent::StorageWriteFailed {
            target: StorageTarget::MeasurementLog,
            error: StorageError::WriteFailed,
            attempts: 3,
        }
    )));

    lp.sink_mut().fail_with = None;
    let report = lp.tick();
    assert!(report.appended);
    assert_eq!(lp.sink().records.len(), 1);
}

#[test]
fn full_log_is_not_retried() {
    let mut lp = make_loop(MockSensor::with_co2(&[500, 500]), MemoryStore::empty());
    lp.sink_mut().fail_with = Some(StorageError::Full);

    assert!(!lp.tick().appended);
    assert_eq!(lp.sink().attempts, 1);
    assert!(lp.events().events.contains(&AppEvent::StorageWriteFailed {
        target: StorageTarget::MeasurementLog,
        error: StorageError::Full,
        attempts: 1,
    }));

    lp.tick();
    assert_eq!(lp.sink().attempts, 2);
}

// ── Sensor failures ──────────────────────────────────────────

#[test]
fn sensor_failure_skips_tick_but_time_still_advances() {
    let mut sensor = MockSensor::with_co2(&[1600]);
    sensor.push_co2(Err(SensorError::Crc));
    let mut lp = make_loop(sensor, MemoryStore::empty());

    lp.tick();
    assert!(lp.alert());
    let elapsed_before = lp.elapsed_secs();

    let report = lp.tick();
    assert_eq!(report.record, None);
    assert_eq!(report.sensor_error, Some(SensorError::Crc));
    assert!(!report.appended);
    // Alert state and indicator untouched.
    assert!(report.alert);
    assert_eq!(lp.indicator().writes, vec![true]);
    assert_eq!(lp.sink().records.len(), 1);
    // Still slept and accounted for the tick.
    assert_eq!(lp.elapsed_secs(), elapsed_before + 2);
    assert_eq!(lp.delay().calls, 2);
    assert_eq!(
        lp.events().count(|e| matches!(e, AppEvent::SensorReadFailed(SensorError::Crc))),
        1
    );
}

#[test]
fn climate_failure_skips_air_quality_read() {
    let mut sensor = MockSensor::new();
    sensor.climate = Err(SensorError::Checksum);
    let mut lp = make_loop(sensor, MemoryStore::empty());
    let report = lp.tick();
    assert_eq!(report.sensor_error, Some(SensorError::Checksum));
    assert_eq!(lp.sensor().air_reads, 0);
}

// ── Sleep ────────────────────────────────────────────────────

#[test]
fn each_tick_sleeps_the_configured_interval() {
    let mut lp = make_loop(MockSensor::new(), MemoryStore::empty());
    for _ in 0..10 {
        lp.tick();
    }
    assert_eq!(lp.delay().total_ms(), 20_000);
    assert_eq!(lp.tick_count(), 10);
}

// ── Calibration restore ──────────────────────────────────────

#[test]
fn missing_store_falls_back_to_zero_and_is_not_applied() {
    let mut lp = make_loop(MockSensor::new(), MemoryStore::empty());
    let b = lp.restore_calibration();
    assert_eq!(b, CalibrationBaseline::new(0, 0));
    assert!(lp.sensor().applied.is_empty());
    assert_eq!(
        lp.events().events,
        vec![AppEvent::BaselineFallback(StorageError::Unavailable)]
    );
}

#[test]
fn corrupted_store_falls_back_to_zero() {
    let store = MemoryStore {
        restore_error: Some(StorageError::Corrupted),
        ..MemoryStore::default()
    };
    let mut lp = make_loop(MockSensor::new(), store);
    assert!(lp.restore_calibration().is_unset());
    assert!(lp.sensor().applied.is_empty());
}

#[test]
fn stored_baseline_is_applied_to_sensor() {
    let stored = CalibrationBaseline::new(35187, 36421);
    let mut lp = make_loop(MockSensor::new(), MemoryStore::holding(stored));
    assert_eq!(lp.restore_calibration(), stored);
    assert_eq!(lp.sensor().applied, vec![stored]);
    assert_eq!(lp.baseline(), stored);
}

#[test]
fn rejected_baseline_is_reported_not_fatal() {
    let mut sensor = MockSensor::new();
    sensor.apply_error = Some(SensorError::Bus);
    let mut lp = make_loop(sensor, MemoryStore::holding(CalibrationBaseline::new(1, 2)));
    lp.restore_calibration();
    assert!(
        lp.events()
            .events
            .contains(&AppEvent::BaselineApplyFailed(SensorError::Bus))
    );
    assert!(lp.tick().record.is_some());
}

// ── Checkpoint cadence ───────────────────────────────────────

#[test]
fn first_checkpoint_after_one_hour_of_ticks() {
    let mut sensor = MockSensor::new();
    sensor.baseline = CalibrationBaseline::new(0x8a00, 0x8b00);
    let mut lp = make_loop(sensor, MemoryStore::empty());
    lp.restore_calibration();

    for _ in 0..1799 {
        assert_eq!(lp.tick().checkpoint, None);
    }
    assert!(lp.store().checkpoints.is_empty());
    assert_eq!(lp.elapsed_secs(), 3598);

    let report = lp.tick();
    assert_eq!(
        report.checkpoint,
        Some(CheckpointOutcome::Saved(CalibrationBaseline::new(0x8a00, 0x8b00)))
    );
    assert_eq!(lp.elapsed_secs(), 0);
    assert_eq!(lp.store().checkpoints, vec![CalibrationBaseline::new(0x8a00, 0x8b00)]);
    assert_eq!(lp.baseline(), CalibrationBaseline::new(0x8a00, 0x8b00));
}

#[test]
fn checkpoints_repeat_every_interval() {
    let mut lp = make_loop(MockSensor::new(), MemoryStore::empty());
    for _ in 0..(1800 * 3) {
        lp.tick();
    }
    assert_eq!(lp.store().checkpoints.len(), 3);
}

#[test]
fn checkpoint_runs_even_when_sensor_read_fails_that_tick() {
    let config = MonitorConfig {
        checkpoint_interval_secs: 4,
        ..MonitorConfig::default()
    };
    let mut sensor = MockSensor::with_co2(&[500]);
    sensor.push_co2(Err(SensorError::Timeout));
    let mut lp = make_loop_with(&config, sensor, MockIndicator::new(false), MemoryStore::empty());

    assert_eq!(lp.tick().checkpoint, None);
    let report = lp.tick();
    assert_eq!(report.sensor_error, Some(SensorError::Timeout));
    assert!(matches!(report.checkpoint, Some(CheckpointOutcome::Saved(_))));
}

#[test]
fn transient_checkpoint_failure_is_retried() {
    let config = MonitorConfig {
        checkpoint_interval_secs: 2,
        ..MonitorConfig::default()
    };
    let store = MemoryStore {
        failing_writes: 2,
        ..MemoryStore::default()
    };
    let mut lp = make_loop_with(&config, MockSensor::new(), MockIndicator::new(false), store);
    let report = lp.tick();
    assert!(matches!(report.checkpoint, Some(CheckpointOutcome::Saved(_))));
    assert_eq!(lp.store().write_attempts, 3);
}

#[test]
fn exhausted_checkpoint_is_reported_and_counter_still_resets() {
    let config = MonitorConfig {
        checkpoint_interval_secs: 4,
        ..MonitorConfig::default()
    };
    let store = MemoryStore {
        failing_writes: u32::MAX,
        ..MemoryStore::default()
    };
    let mut lp = make_loop_with(&config, MockSensor::new(), MockIndicator::new(false), store);
    lp.tick();
    let report = lp.tick();
    assert_eq!(
        report.checkpoint,
        Some(CheckpointOutcome::WriteFailed(StorageError::WriteFailed))
    );
    assert_eq!(lp.elapsed_secs(), 0);
    assert_eq!(lp.store().write_attempts, 3);
    assert!(lp.events().events.iter().any(|e| matches!(
        e,
        AppEvent::StorageWriteFailed {
            target: StorageTarget::Calibration,
            ..
        }
    )));

    // Next interval tries again.
    lp.tick();
    lp.tick();
    assert_eq!(lp.store().write_attempts, 6);
}

#[test]
fn baseline_read_failure_writes_nothing() {
    let config = MonitorConfig {
        checkpoint_interval_secs: 2,
        ..MonitorConfig::default()
    };
    let mut sensor = MockSensor::new();
    sensor.baseline_error = Some(SensorError::Crc);
    let mut lp = make_loop_with(&config, sensor, MockIndicator::new(false), MemoryStore::empty());
    let report = lp.tick();
    assert_eq!(report.checkpoint, Some(CheckpointOutcome::ReadFailed(SensorError::Crc)));
    assert_eq!(lp.store().write_attempts, 0);
    assert_eq!(lp.elapsed_secs(), 0);
}

// ── Start ────────────────────────────────────────────────────

#[test]
fn start_announces_current_alert_state() {
    let mut lp = make_loop_with(
        &MonitorConfig::default(),
        MockSensor::new(),
        MockIndicator::new(true),
        MemoryStore::empty(),
    );
    lp.start();
    assert_eq!(lp.events().events, vec![AppEvent::Started { alert: true }]);
}
