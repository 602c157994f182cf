//! Scheduling loop — the hexagonal core.
//!
//! [`SchedulingLoop`] owns every port handle it needs and drives the
//! measurement cadence, the alert state machine and the calibration
//! checkpoint from one elapsed-time counter.
//!
//! ```text
//!  SensorPort ──▶ ┌─────────────────────────┐ ──▶ MeasurementSink
//!                 │     SchedulingLoop       │ ──▶ AlertIndicator
//!  DelayNs ◀──────│ policy · CheckpointTimer │ ──▶ CalibrationStore
//!                 └─────────────────────────┘ ──▶ EventSink
//! ```
//!
//! Single-threaded and cooperative: the only suspension point is the
//! blocking tick sleep.  No invariant spans more than one tick, so the
//! process may be killed at any tick boundary.

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::config::MonitorConfig;
use crate::error::{Error, SensorError, StorageError};
use crate::scheduler::CheckpointTimer;

use super::events::{AppEvent, StorageTarget};
use super::model::{CalibrationBaseline, MeasurementRecord};
use super::policy;
use super::ports::{AlertIndicator, CalibrationStore, EventSink, MeasurementSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// Tick reporting
// ───────────────────────────────────────────────────────────────

/// Result of a checkpoint attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointOutcome {
    /// The baseline was persisted.
    Saved(CalibrationBaseline),
    /// The sensor could not report its baseline; nothing was written.
    ReadFailed(SensorError),
    /// Every write attempt failed.
    WriteFailed(StorageError),
}

/// What one call to [`SchedulingLoop::tick`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// The measurement taken this tick, if the sensors answered.
    pub record: Option<MeasurementRecord>,
    /// Why no measurement was taken.
    pub sensor_error: Option<SensorError>,
    /// The record reached the measurement log.
    pub appended: bool,
    /// The indicator was written this tick.
    pub alert_changed: bool,
    /// Alert state after the tick.
    pub alert: bool,
    /// Set on checkpoint ticks.
    pub checkpoint: Option<CheckpointOutcome>,
}

// ───────────────────────────────────────────────────────────────
// SchedulingLoop
// ───────────────────────────────────────────────────────────────

/// The monitor's control loop.
pub struct SchedulingLoop<S, A, C, M, E, D> {
    sensor: S,
    indicator: A,
    store: C,
    sink: M,
    events: E,
    delay: D,
    tick_secs: u32,
    threshold: u16,
    retry_attempts: u8,
    alert: bool,
    timer: CheckpointTimer,
    baseline: CalibrationBaseline,
    tick_count: u64,
}

impl<S, A, C, M, E, D> SchedulingLoop<S, A, C, M, E, D>
where
    S: SensorPort,
    A: AlertIndicator,
    C: CalibrationStore,
    M: MeasurementSink,
    E: EventSink,
    D: DelayNs,
{
    /// Construct the loop around its port handles.
    ///
    /// The initial alert state is read back from the indicator so the two
    /// agree before the first tick.  Call [`restore_calibration`] next.
    ///
    /// [`restore_calibration`]: Self::restore_calibration
    pub fn new(
        config: &MonitorConfig,
        sensor: S,
        indicator: A,
        store: C,
        sink: M,
        events: E,
        delay: D,
    ) -> Self {
        let alert = indicator.is_alert();
        debug!(
            "SchedulingLoop: checkpoint every {} ticks",
            config.ticks_per_checkpoint()
        );
        Self {
            sensor,
            indicator,
            store,
            sink,
            events,
            delay,
            tick_secs: config.tick_interval_secs,
            threshold: config.co2eq_warning_level,
            retry_attempts: config.storage_retry_attempts.max(1),
            alert,
            timer: CheckpointTimer::new(config.checkpoint_interval_secs),
            baseline: CalibrationBaseline::default(),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Load the persisted baseline and hand it to the sensor.
    ///
    /// A missing or unreadable store is not fatal: the loop continues on
    /// the `{0,0}` fallback and the sensor keeps its own power-on baseline.
    pub fn restore_calibration(&mut self) -> CalibrationBaseline {
        match self.store.restore() {
            Ok(baseline) => {
                self.baseline = baseline;
                if baseline.is_unset() {
                    debug!("SchedulingLoop: stored baseline is unset, not applying");
                    self.events.emit(&AppEvent::BaselineRestored(baseline));
                } else {
                    match self.sensor.apply_calibration(baseline) {
                        Ok(()) => self.events.emit(&AppEvent::BaselineRestored(baseline)),
                        Err(e) => self.events.emit(&AppEvent::BaselineApplyFailed(e)),
                    }
                }
            }
            Err(e) => {
                self.baseline = CalibrationBaseline::default();
                self.events.emit(&AppEvent::BaselineFallback(e));
            }
        }
        self.baseline
    }

    /// Announce the loop.  [`run`](Self::run) calls this itself.
    pub fn start(&mut self) {
        self.events.emit(&AppEvent::Started { alert: self.alert });
        info!(
            "SchedulingLoop started: tick={}s checkpoint={}s threshold={}ppm",
            self.tick_secs,
            self.timer.interval_secs(),
            self.threshold
        );
    }

    /// Tick forever.  The only exit is process termination.
    pub fn run(mut self) -> ! {
        self.start();
        loop {
            self.tick();
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full cycle: measure → log → alert → sleep → checkpoint.
    pub fn tick(&mut self) -> TickReport {
        self.tick_count += 1;
        let mut report = TickReport::default();

        // 1–2. Acquire both readings and combine them.
        match self.measure() {
            Ok(record) => {
                report.record = Some(record);
                self.events.emit(&AppEvent::Measurement(record));

                // 3. Append to the measurement log.
                report.appended = self.append_record(&record);

                // 4. Alert evaluation; indicator written on transitions only.
                report.alert_changed = self.evaluate_alert(record.co2eq);
            }
            Err(e) => {
                report.sensor_error = Some(e);
                self.events.emit(&AppEvent::SensorReadFailed(e));
            }
        }
        report.alert = self.alert;

        // 5. Cooperative suspension.
        self.delay.delay_ms(self.tick_secs.saturating_mul(1000));

        // 6–7. Elapsed-time accounting and checkpoint gate.
        if self.timer.advance(self.tick_secs) {
            report.checkpoint = Some(self.checkpoint_now());
        } else {
            debug!("next checkpoint in {}s", self.timer.remaining_secs());
        }

        report
    }

    /// Apply the alert policy to `co2eq`.  Returns `true` if the indicator
    /// was written, which only happens on a state change.
    pub fn evaluate_alert(&mut self, co2eq: u16) -> bool {
        let next = policy::decide(co2eq, self.threshold, self.alert);
        if next == self.alert {
            return false;
        }
        self.indicator.set_alert(next);
        self.alert = next;
        self.events.emit(&AppEvent::AlertChanged {
            active: next,
            co2eq,
        });
        true
    }

    /// Read the sensor's baseline and persist it.
    ///
    /// Called by [`tick`](Self::tick) on checkpoint boundaries; the elapsed
    /// counter is not touched here.
    pub fn checkpoint_now(&mut self) -> CheckpointOutcome {
        let baseline = match self.sensor.current_calibration() {
            Ok(b) => b,
            Err(e) => {
                self.events.emit(&AppEvent::CheckpointReadFailed(e));
                return CheckpointOutcome::ReadFailed(e);
            }
        };

        let store = &mut self.store;
        match with_retries_when(self.retry_attempts, StorageError::is_transient, || {
            store.checkpoint(baseline)
        }) {
            Ok(()) => {
                self.baseline = baseline;
                self.events.emit(&AppEvent::CheckpointSaved(baseline));
                CheckpointOutcome::Saved(baseline)
            }
            Err(error) => {
                self.events.emit(&AppEvent::StorageWriteFailed {
                    target: StorageTarget::Calibration,
                    error,
                    attempts: self.attempts_spent(error),
                });
                CheckpointOutcome::WriteFailed(error)
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current alert state.
    pub fn alert(&self) -> bool {
        self.alert
    }

    /// Seconds accumulated since the last checkpoint.
    pub fn elapsed_secs(&self) -> u32 {
        self.timer.elapsed_secs()
    }

    /// Last baseline restored or persisted.
    pub fn baseline(&self) -> CalibrationBaseline {
        self.baseline
    }

    /// Ticks executed since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn indicator(&self) -> &A {
        &self.indicator
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    pub fn sink(&self) -> &M {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut M {
        &mut self.sink
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    // ── Internal ──────────────────────────────────────────────

    fn measure(&mut self) -> Result<MeasurementRecord, SensorError> {
        let climate = self.sensor.read_climate()?;
        let air = self.sensor.read_air_quality()?;
        Ok(MeasurementRecord::new(climate, air))
    }

    fn append_record(&mut self, record: &MeasurementRecord) -> bool {
        let sink = &mut self.sink;
        match with_retries_when(self.retry_attempts, StorageError::is_transient, || {
            sink.append(record)
        }) {
            Ok(()) => true,
            Err(error) => {
                self.events.emit(&AppEvent::StorageWriteFailed {
                    target: StorageTarget::MeasurementLog,
                    error,
                    attempts: self.attempts_spent(error),
                });
                false
            }
        }
    }

    fn attempts_spent(&self, error: StorageError) -> u8 {
        if error.is_transient() {
            self.retry_attempts
        } else {
            1
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Bounded retry
// ───────────────────────────────────────────────────────────────

/// Run `op` up to `attempts` times, returning the first success or the
/// last error.
pub fn with_retries<T, Fail: core::fmt::Display>(
    attempts: u8,
    op: impl FnMut() -> Result<T, Fail>,
) -> Result<T, Fail> {
    with_retries_when(attempts, |_| true, op)
}

/// As [`with_retries`], but gives up at once on an error `retry` rejects.
pub fn with_retries_when<T, Fail: core::fmt::Display>(
    attempts: u8,
    retry: impl Fn(&Fail) -> bool,
    mut op: impl FnMut() -> Result<T, Fail>,
) -> Result<T, Fail> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if attempt >= attempts || !retry(&e) => return Err(e),
            Err(e) => {
                debug!("attempt {}/{} failed: {}", attempt, attempts, e);
                attempt += 1;
            }
        }
    }
}

/// Bring a peripheral up with a small bounded number of attempts.
///
/// Exhaustion is a fatal initialisation failure; `what` names the
/// peripheral in the resulting error.
pub fn init_with_retries<T, Fail: core::fmt::Display>(
    attempts: u8,
    what: &'static str,
    delay: &mut impl DelayNs,
    mut op: impl FnMut() -> Result<T, Fail>,
) -> Result<T, Error> {
    let attempts = attempts.max(1);
    for attempt in 1..=attempts {
        match op() {
            Ok(v) => {
                info!("{} ready (attempt {}/{})", what, attempt, attempts);
                return Ok(v);
            }
            Err(e) => {
                log::warn!("{} init attempt {}/{} failed: {}", what, attempt, attempts, e);
                if attempt < attempts {
                    delay.delay_ms(100);
                }
            }
        }
    }
    log::error!("{} did not come up after {} attempts", what, attempts);
    Err(Error::Init(what))
}
