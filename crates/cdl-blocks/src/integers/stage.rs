//! Staging of a normalized demand into an integer stage count.
//!
//! The unit interval is split by the `n` thresholds `k / n`, `k = 0..n`.
//! Without hysteresis the stage for input `u` is the number of thresholds it
//! strictly exceeds, so a value sitting exactly on a threshold resolves to the
//! lower stage. Moving away from the current stage `y` requires crossing the
//! neighbouring threshold by the band `h`:
//!
//! - up:   `u > y / n + h`
//! - down: `u <= max((y - 1) / n - h, 0)`
//!
//! and at least `hold_duration` seconds since construction, the last reset
//! or the last committed change. A committed change jumps straight to the
//! raw stage of `u`.

use cdl_core::{CdlError, CdlResult, ensure_non_negative};
use serde::{Deserialize, Serialize};

use crate::block::{Block, TimeSource};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageConfig {
    /// Number of stages, at least 1.
    pub n: i64,
    /// Minimum time between stage changes (seconds).
    pub hold_duration: f64,
    /// Hysteresis band; `0.02 / n` when `None`.
    pub h: Option<f64>,
    pub pre_y_start: i64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            n: 1,
            hold_duration: 0.0,
            h: None,
            pre_y_start: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageState {
    pub y: i64,
    /// Earliest time the next change may commit. `None` only for a block
    /// built without a time source.
    pub next_change_time: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Stage {
    pub n: i64,
    pub hold_duration: f64,
    pub h: f64,
    pub pre_y_start: i64,
    time: TimeSource,
    state: StageState,
}

impl Stage {
    pub fn new(time: impl Into<TimeSource>, config: StageConfig) -> CdlResult<Self> {
        if config.n < 1 {
            return Err(CdlError::config(Self::NAME, "n must be >= 1"));
        }
        if !(0..=config.n).contains(&config.pre_y_start) {
            return Err(CdlError::config(Self::NAME, "pre_y_start must be in [0, n]"));
        }
        let hold_duration = ensure_non_negative(
            config.hold_duration,
            Self::NAME,
            "holdDuration must be >= 0",
        )?;
        let h = ensure_non_negative(
            config.h.unwrap_or(0.02 / config.n as f64),
            Self::NAME,
            "h must be >= 0",
        )?;
        let mut stage = Self {
            n: config.n,
            hold_duration,
            h,
            pre_y_start: config.pre_y_start,
            time: time.into(),
            state: StageState {
                y: config.pre_y_start,
                next_change_time: None,
            },
        };
        stage.reset_state();
        Ok(stage)
    }

    /// Threshold below stage `k + 1`.
    fn threshold(&self, k: i64) -> f64 {
        k as f64 / self.n as f64
    }

    /// Stage without hysteresis or hold.
    pub fn raw_stage(&self, u: f64) -> i64 {
        (0..self.n).filter(|&k| u > self.threshold(k)).count() as i64
    }

    fn wants_up(&self, y: i64, u: f64) -> bool {
        y < self.n && u > self.threshold(y) + self.h
    }

    fn wants_down(&self, y: i64, u: f64) -> bool {
        y > 0 && u <= (self.threshold(y - 1) - self.h).max(0.0)
    }
}

impl Block for Stage {
    type Input = f64;
    type Output = i64;
    type State = StageState;

    const NAME: &'static str = "Stage";

    fn compute(&mut self, u: f64) -> CdlResult<i64> {
        let now = self.time.now(Self::NAME)?;
        let y = self.state.y;

        let hold_elapsed = self.state.next_change_time.is_none_or(|t| now >= t);

        if hold_elapsed && (self.wants_up(y, u) || self.wants_down(y, u)) {
            let next = self.raw_stage(u);
            if next != y {
                self.state.y = next;
                self.state.next_change_time = Some(now + self.hold_duration);
            }
        }
        Ok(self.state.y)
    }

    fn reset_state(&mut self) {
        let now = self.time.manager().map(|tm| tm.get_time());
        self.state = StageState {
            y: self.pre_y_start,
            next_change_time: now.map(|t| t + self.hold_duration),
        };
    }

    fn state(&self) -> StageState {
        self.state
    }

    fn set_state(&mut self, state: StageState) {
        self.state = state;
    }
}
