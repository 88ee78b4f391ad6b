//! Boolean signal sources driven by the clock.

use cdl_core::{CdlError, CdlResult, TIME_EPS, ensure_positive, floor_mod};
use serde::{Deserialize, Serialize};

use crate::block::{Block, TimeSource, stateless_block};

stateless_block!(
    /// Constant boolean output.
    Constant { k: bool },
    () => bool,
    |this, _u| Ok(this.k)
);

/// Periodic on/off timing shared by the boolean, real and integer pulses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseShape {
    /// Fraction of the period spent high, in `(0, 1]`.
    pub width: f64,
    pub period: f64,
    pub shift: f64,
}

impl PulseShape {
    pub fn new(block: &'static str, width: f64, period: f64, shift: f64) -> CdlResult<Self> {
        if !(width > 0.0 && width <= 1.0) {
            return Err(CdlError::config(block, "width must be in (0, 1]"));
        }
        let period = ensure_positive(period, block, "period must be > 0")?;
        Ok(Self {
            width,
            period,
            shift,
        })
    }

    /// High during the first `width * period` seconds of each period.
    /// Low before `shift`.
    pub fn is_high(&self, t: f64) -> bool {
        let adjusted = t - self.shift;
        adjusted >= 0.0 && floor_mod(adjusted, self.period) < self.width * self.period
    }
}

/// Boolean pulse train.
#[derive(Debug, Clone)]
pub struct Pulse {
    pub shape: PulseShape,
    time: TimeSource,
}

impl Pulse {
    pub fn new(time: impl Into<TimeSource>, width: f64, period: f64, shift: f64) -> CdlResult<Self> {
        Ok(Self {
            shape: PulseShape::new(Self::NAME, width, period, shift)?,
            time: time.into(),
        })
    }
}

impl Block for Pulse {
    type Input = ();
    type Output = bool;
    type State = ();

    const NAME: &'static str = "Pulse";

    fn compute(&mut self, _input: ()) -> CdlResult<bool> {
        let now = self.time.now(Self::NAME)?;
        Ok(self.shape.is_high(now))
    }

    fn reset_state(&mut self) {}

    fn state(&self) {}

    fn set_state(&mut self, _state: ()) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleTriggerState {
    /// Time of the last emitted trigger.
    pub last_trigger_time: Option<f64>,
}

/// True at the sample instants `shift + k * period`, false otherwise.
///
/// Fires at most once per distinct timestamp, so repeated evaluation at the
/// same time does not re-trigger.
#[derive(Debug, Clone)]
pub struct SampleTrigger {
    pub period: f64,
    pub shift: f64,
    time: TimeSource,
    state: SampleTriggerState,
}

impl SampleTrigger {
    pub fn new(time: impl Into<TimeSource>, period: f64, shift: f64) -> CdlResult<Self> {
        Ok(Self {
            period: ensure_positive(period, Self::NAME, "period must be > 0")?,
            shift,
            time: time.into(),
            state: SampleTriggerState::default(),
        })
    }

    fn at_sample_instant(&self, t: f64) -> bool {
        let adjusted = t - self.shift;
        if adjusted < 0.0 {
            return false;
        }
        let phase = floor_mod(adjusted, self.period);
        phase < TIME_EPS || self.period - phase < TIME_EPS
    }
}

impl Block for SampleTrigger {
    type Input = ();
    type Output = bool;
    type State = SampleTriggerState;

    const NAME: &'static str = "SampleTrigger";

    fn compute(&mut self, _input: ()) -> CdlResult<bool> {
        let now = self.time.now(Self::NAME)?;
        let fresh = self
            .state
            .last_trigger_time
            .is_none_or(|last| (now - last).abs() > TIME_EPS);
        let trigger = self.at_sample_instant(now) && fresh;
        if trigger {
            self.state.last_trigger_time = Some(now);
        }
        Ok(trigger)
    }

    fn reset_state(&mut self) {
        self.state = SampleTriggerState::default();
    }

    fn state(&self) -> SampleTriggerState {
        self.state
    }

    fn set_state(&mut self, state: SampleTriggerState) {
        self.state = state;
    }
}

/// Periodic boolean table: rows are `[t, b1, b2, ...]` with 0/1 values.
///
/// Same timing rules as [`crate::integers::TimeTable`].
#[derive(Debug, Clone)]
pub struct TimeTable {
    table: crate::integers::TimeTable,
}

impl TimeTable {
    pub fn new(
        time: impl Into<TimeSource>,
        table: &[Vec<f64>],
        time_scale: f64,
        period: f64,
    ) -> CdlResult<Self> {
        let binary = |v: &f64| v.abs() < 1e-6 || (v - 1.0).abs() < 1e-6;
        if !table.iter().all(|row| row.iter().skip(1).all(binary)) {
            return Err(CdlError::config(Self::NAME, "table values must be 0 or 1"));
        }
        Ok(Self {
            table: crate::integers::TimeTable::named(Self::NAME, time, table, time_scale, period)?,
        })
    }

    /// Daily table with time in seconds.
    pub fn daily(time: impl Into<TimeSource>, table: &[Vec<f64>]) -> CdlResult<Self> {
        Self::new(time, table, 1.0, 86_400.0)
    }
}

impl Block for TimeTable {
    type Input = ();
    type Output = Vec<bool>;
    type State = ();

    const NAME: &'static str = "TimeTable";

    fn compute(&mut self, _input: ()) -> CdlResult<Vec<bool>> {
        Ok(self.table.values_at(Self::NAME)?.iter().map(|&v| v > 0).collect())
    }

    fn reset_state(&mut self) {}

    fn state(&self) {}

    fn set_state(&mut self, _state: ()) {}
}
