//! Time source shared by every time-dependent block.
//!
//! A `TimeManager` runs in one of two modes:
//! - **Simulation**: time only moves when the driver calls [`TimeManager::advance`]
//! - **Realtime**: every read resyncs to the wall clock
//!
//! All operations go through a single mutex, so one manager can be read by
//! a monitoring thread while the control thread advances it. Sequences of
//! calls are not atomic as a whole.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CdlError, CdlResult};

/// Execution mode of a [`TimeManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Externally stepped simulation time.
    Simulation,
    /// Wall-clock time.
    Realtime,
}

/// Full snapshot of a time manager, as written to checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeState {
    pub mode: ExecutionMode,
    pub current_time: f64,
    pub time_step: Option<f64>,
}

/// Partial restore record. Only the fields that are present are applied.
///
/// `time_step` distinguishes "absent" (`None`) from "present and unset"
/// (`Some(None)`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct TimeStatePatch {
    #[serde(default)]
    pub mode: Option<ExecutionMode>,
    #[serde(default)]
    pub current_time: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    pub time_step: Option<Option<f64>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<TimeState> for TimeStatePatch {
    fn from(state: TimeState) -> Self {
        Self {
            mode: Some(state.mode),
            current_time: Some(state.current_time),
            time_step: Some(state.time_step),
        }
    }
}

#[derive(Debug)]
struct Inner {
    mode: ExecutionMode,
    current_time: f64,
    time_step: Option<f64>,
}

/// Wall-clock time in fractional seconds since the Unix epoch.
pub fn wall_clock() -> f64 {
    let now = Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_nanos()) * 1e-9
}

fn epoch(mode: ExecutionMode) -> f64 {
    match mode {
        ExecutionMode::Simulation => 0.0,
        ExecutionMode::Realtime => wall_clock(),
    }
}

/// Single point of truth for "current time".
///
/// Owned by the execution driver and shared (usually as `Arc<TimeManager>`)
/// with every block that needs time. Blocks only ever read it.
#[derive(Debug)]
pub struct TimeManager {
    inner: Mutex<Inner>,
}

impl TimeManager {
    /// Create a time manager.
    ///
    /// # Arguments
    ///
    /// * `mode` - Execution mode
    /// * `start_time` - Initial time (default: 0.0 in simulation, wall clock in realtime)
    /// * `time_step` - Default increment used by `advance(None)` in simulation mode
    pub fn new(mode: ExecutionMode, start_time: Option<f64>, time_step: Option<f64>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                mode,
                current_time: start_time.unwrap_or_else(|| epoch(mode)),
                time_step,
            }),
        }
    }

    /// Simulation-mode manager starting at 0.0 with a default step.
    pub fn simulation(time_step: f64) -> Self {
        Self::new(ExecutionMode::Simulation, None, Some(time_step))
    }

    /// Realtime manager synced to the wall clock.
    pub fn realtime() -> Self {
        Self::new(ExecutionMode::Realtime, None, None)
    }

    // The guarded record holds plain values, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn mode(&self) -> ExecutionMode {
        self.lock().mode
    }

    pub fn time_step(&self) -> Option<f64> {
        self.lock().time_step
    }

    /// Current time in seconds.
    ///
    /// In realtime mode the stored time is refreshed from the wall clock first.
    pub fn get_time(&self) -> f64 {
        let mut inner = self.lock();
        if inner.mode == ExecutionMode::Realtime {
            inner.current_time = wall_clock();
        }
        inner.current_time
    }

    /// Advance time and return the new current time.
    ///
    /// Simulation mode adds `dt`, falling back to the configured time step.
    /// Realtime mode ignores `dt` and resyncs to the wall clock.
    pub fn advance(&self, dt: Option<f64>) -> CdlResult<f64> {
        let mut inner = self.lock();
        match inner.mode {
            ExecutionMode::Simulation => {
                let step = dt.or(inner.time_step).ok_or(CdlError::Configuration {
                    block: "TimeManager",
                    what: "no step size available",
                })?;
                inner.current_time += step;
            }
            ExecutionMode::Realtime => {
                inner.current_time = wall_clock();
            }
        }
        Ok(inner.current_time)
    }

    /// Reset to `start_time`, or to the mode's epoch.
    pub fn reset(&self, start_time: Option<f64>) {
        let mut inner = self.lock();
        inner.current_time = start_time.unwrap_or_else(|| epoch(inner.mode));
        tracing::debug!(time = inner.current_time, "time manager reset");
    }

    /// Switch execution mode.
    ///
    /// Switching to realtime without a start time resyncs immediately.
    pub fn set_mode(&self, mode: ExecutionMode, start_time: Option<f64>) {
        let mut inner = self.lock();
        inner.mode = mode;
        if let Some(t) = start_time {
            inner.current_time = t;
        } else if mode == ExecutionMode::Realtime {
            inner.current_time = wall_clock();
        }
        tracing::debug!(?mode, time = inner.current_time, "time manager mode switched");
    }

    pub fn set_time_step(&self, time_step: Option<f64>) {
        self.lock().time_step = time_step;
    }

    /// Snapshot for checkpointing.
    pub fn get_state(&self) -> TimeState {
        let inner = self.lock();
        TimeState {
            mode: inner.mode,
            current_time: inner.current_time,
            time_step: inner.time_step,
        }
    }

    /// Restore from a (possibly partial) snapshot.
    pub fn set_state(&self, state: impl Into<TimeStatePatch>) {
        let patch = state.into();
        let mut inner = self.lock();
        if let Some(mode) = patch.mode {
            inner.mode = mode;
        }
        if let Some(t) = patch.current_time {
            inner.current_time = t;
        }
        if let Some(step) = patch.time_step {
            inner.time_step = step;
        }
    }
}

impl Default for TimeManager {
    /// Simulation mode at 0.0 with no default step.
    fn default() -> Self {
        Self::new(ExecutionMode::Simulation, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn simulation_starts_at_zero() {
        let tm = TimeManager::new(ExecutionMode::Simulation, None, None);
        assert_eq!(tm.mode(), ExecutionMode::Simulation);
        assert_eq!(tm.get_time(), 0.0);
    }

    #[test]
    fn simulation_custom_start() {
        let tm = TimeManager::new(ExecutionMode::Simulation, Some(10.0), None);
        assert_eq!(tm.get_time(), 10.0);
    }

    #[test]
    fn advance_uses_dt_then_time_step() {
        let tm = TimeManager::simulation(0.1);
        let t = tm.advance(None).unwrap();
        assert!((t - 0.1).abs() < 1e-12);
        let t = tm.advance(Some(0.5)).unwrap();
        assert!((t - 0.6).abs() < 1e-12);
    }

    #[test]
    fn advance_without_step_is_configuration_error() {
        let tm = TimeManager::default();
        let err = tm.advance(None).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(tm.get_time(), 0.0);
    }

    #[test]
    fn realtime_tracks_wall_clock() {
        let before = wall_clock();
        let tm = TimeManager::realtime();
        let t = tm.get_time();
        let after = wall_clock();
        assert!(t >= before && t <= after + 1e-3);

        // dt is ignored in realtime mode
        let t2 = tm.advance(Some(1000.0)).unwrap();
        assert!(t2 < wall_clock() + 1.0);
    }

    #[test]
    fn reset_returns_to_epoch_or_start() {
        let tm = TimeManager::simulation(1.0);
        tm.advance(None).unwrap();
        tm.reset(None);
        assert_eq!(tm.get_time(), 0.0);
        tm.reset(Some(5.0));
        assert_eq!(tm.get_time(), 5.0);
    }

    #[test]
    fn set_mode_to_realtime_resyncs() {
        let tm = TimeManager::simulation(1.0);
        let before = wall_clock();
        tm.set_mode(ExecutionMode::Realtime, None);
        assert!(tm.get_state().current_time >= before);

        tm.set_mode(ExecutionMode::Simulation, Some(3.0));
        assert_eq!(tm.get_time(), 3.0);
    }

    #[test]
    fn state_round_trip() {
        let tm = TimeManager::simulation(0.1);
        for _ in 0..5 {
            tm.advance(None).unwrap();
        }
        let saved = tm.get_state();
        for _ in 0..5 {
            tm.advance(None).unwrap();
        }
        tm.set_state(saved);
        assert!((tm.get_time() - 0.5).abs() < 1e-12);
        assert_eq!(tm.time_step(), Some(0.1));
    }

    #[test]
    fn partial_state_only_applies_present_fields() {
        let tm = TimeManager::simulation(0.1);
        let patch: TimeStatePatch = serde_json::from_str(r#"{"current_time": 7.5}"#).unwrap();
        tm.set_state(patch);
        assert_eq!(tm.get_time(), 7.5);
        assert_eq!(tm.time_step(), Some(0.1));
        assert_eq!(tm.mode(), ExecutionMode::Simulation);

        let patch: TimeStatePatch = serde_json::from_str(r#"{"time_step": null}"#).unwrap();
        tm.set_state(patch);
        assert_eq!(tm.time_step(), None);
        assert_eq!(tm.get_time(), 7.5);
    }

    #[test]
    fn mode_serializes_lowercase() {
        let json = serde_json::to_string(&ExecutionMode::Simulation).unwrap();
        assert_eq!(json, "\"simulation\"");
        let mode: ExecutionMode = serde_json::from_str("\"realtime\"").unwrap();
        assert_eq!(mode, ExecutionMode::Realtime);
    }

    #[test]
    fn concurrent_advances_are_serialized() {
        let tm = Arc::new(TimeManager::simulation(0.5));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let tm = Arc::clone(&tm);
                thread::spawn(move || {
                    for _ in 0..100 {
                        tm.advance(None).unwrap();
                        let _ = tm.get_time();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert!((tm.get_time() - 200.0).abs() < 1e-9);
    }
}
