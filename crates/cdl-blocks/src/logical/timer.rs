//! Elapsed-time blocks driven by a boolean input.

use cdl_core::{CdlResult, ensure_finite};
use serde::{Deserialize, Serialize};

use crate::block::{Block, TimeSource};

/// Outputs of [`Timer`] and [`TimerAccumulating`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimerOutput {
    /// Elapsed (or accumulated) time in seconds.
    pub y: f64,
    /// Threshold reached.
    pub passed: bool,
}

/// Timer state. `entry_time == None` means the timer is not running.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub entry_time: Option<f64>,
    pub passed: bool,
}

/// Measures how long `u` has been continuously true.
///
/// `y` restarts from zero on each rising `u` and is exactly `0.0` while `u`
/// is false. `passed` latches once the elapsed time reaches `t` and stays
/// set until `u` goes false.
#[derive(Debug, Clone)]
pub struct Timer {
    /// Threshold (seconds).
    pub t: f64,
    time: TimeSource,
    state: TimerState,
}

impl Timer {
    pub fn new(time: impl Into<TimeSource>, t: f64) -> CdlResult<Self> {
        let t = ensure_finite(t, "Timer threshold")?;
        Ok(Self {
            t,
            time: time.into(),
            state: Self::initial(t),
        })
    }

    fn initial(t: f64) -> TimerState {
        TimerState {
            entry_time: None,
            passed: t <= 0.0,
        }
    }
}

impl Block for Timer {
    type Input = bool;
    type Output = TimerOutput;
    type State = TimerState;

    const NAME: &'static str = "Timer";

    fn compute(&mut self, u: bool) -> CdlResult<TimerOutput> {
        let now = self.time.now(Self::NAME)?;
        if !u {
            self.state.entry_time = None;
            self.state.passed = false;
            return Ok(TimerOutput {
                y: 0.0,
                passed: false,
            });
        }

        let entry = match self.state.entry_time {
            Some(entry) => entry,
            None => {
                self.state.entry_time = Some(now);
                self.state.passed = self.t <= 0.0;
                now
            }
        };
        let elapsed = now - entry;
        if elapsed >= self.t {
            self.state.passed = true;
        }
        Ok(TimerOutput {
            y: elapsed,
            passed: self.state.passed,
        })
    }

    fn reset_state(&mut self) {
        self.state = Self::initial(self.t);
    }

    fn state(&self) -> TimerState {
        self.state
    }

    fn set_state(&mut self, state: TimerState) {
        self.state = state;
    }
}

/// Inputs of [`TimerAccumulating`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerAccumulatingInput {
    pub u: bool,
    /// Level-sensitive reset; dominates `u`.
    pub reset: bool,
}

impl TimerAccumulatingInput {
    pub fn new(u: bool, reset: bool) -> Self {
        Self { u, reset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerAccumulatingState {
    pub accumulated: f64,
    pub entry_time: Option<f64>,
    pub passed: bool,
}

/// Accumulates the time `u` is true across on/off periods.
///
/// Accumulation pauses (does not restart) while `u` is false. Only `reset`
/// zeroes the total and clears `passed`.
#[derive(Debug, Clone)]
pub struct TimerAccumulating {
    /// Threshold (seconds).
    pub t: f64,
    time: TimeSource,
    state: TimerAccumulatingState,
}

impl TimerAccumulating {
    pub fn new(time: impl Into<TimeSource>, t: f64) -> CdlResult<Self> {
        let t = ensure_finite(t, "TimerAccumulating threshold")?;
        Ok(Self {
            t,
            time: time.into(),
            state: Self::initial(t),
        })
    }

    fn initial(t: f64) -> TimerAccumulatingState {
        TimerAccumulatingState {
            accumulated: 0.0,
            entry_time: None,
            passed: t <= 0.0,
        }
    }
}

impl Block for TimerAccumulating {
    type Input = TimerAccumulatingInput;
    type Output = TimerOutput;
    type State = TimerAccumulatingState;

    const NAME: &'static str = "TimerAccumulating";

    fn compute(&mut self, input: TimerAccumulatingInput) -> CdlResult<TimerOutput> {
        let now = self.time.now(Self::NAME)?;
        let st = &mut self.state;

        // level-sensitive reset
        if input.reset {
            st.accumulated = 0.0;
            st.entry_time = None;
            st.passed = self.t <= 0.0;
        } else if input.u {
            if let Some(entry) = st.entry_time {
                st.accumulated += now - entry;
            }
            st.entry_time = Some(now);
            if st.accumulated >= self.t {
                st.passed = true;
            }
        } else {
            st.entry_time = None;
        }

        Ok(TimerOutput {
            y: st.accumulated,
            passed: st.passed,
        })
    }

    fn reset_state(&mut self) {
        self.state = Self::initial(self.t);
    }

    fn state(&self) -> TimerAccumulatingState {
        self.state
    }

    fn set_state(&mut self, state: TimerAccumulatingState) {
        self.state = state;
    }
}
