//! Time-qualified boolean holds: on-delay and minimum on/off hold.

use cdl_core::{CdlResult, ensure_finite, ensure_non_negative};
use serde::{Deserialize, Serialize};

use crate::block::{Block, TimeSource, rising};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrueDelayState {
    pub y: bool,
    pub pre_u: bool,
    /// Time at which a pending rise fires.
    pub fire_time: Option<f64>,
}

/// On-delay: a rising `u` shows up at `y` only after `delay_time` seconds.
///
/// Falling `u` clears `y` immediately and cancels any pending rise. The
/// input is taken as false before the first call, so a `u` that is already
/// true then is delayed like any other rise.
#[derive(Debug, Clone)]
pub struct TrueDelay {
    pub delay_time: f64,
    time: TimeSource,
    state: TrueDelayState,
}

impl TrueDelay {
    pub fn new(time: impl Into<TimeSource>, delay_time: f64) -> CdlResult<Self> {
        let delay_time = ensure_finite(delay_time, "TrueDelay delayTime")?;
        Ok(Self {
            delay_time,
            time: time.into(),
            state: TrueDelayState::default(),
        })
    }
}

impl Block for TrueDelay {
    type Input = bool;
    type Output = bool;
    type State = TrueDelayState;

    const NAME: &'static str = "TrueDelay";

    fn compute(&mut self, u: bool) -> CdlResult<bool> {
        let now = self.time.now(Self::NAME)?;
        let st = &mut self.state;

        if !u {
            st.y = false;
            st.fire_time = None;
        } else if rising(st.pre_u, u) {
            if self.delay_time > 0.0 {
                st.fire_time = Some(now + self.delay_time);
                st.y = false;
            } else {
                st.y = true;
                st.fire_time = None;
            }
        } else if let Some(fire) = st.fire_time {
            if now >= fire {
                st.y = true;
                st.fire_time = None;
            }
        } else {
            st.y = true;
        }

        st.pre_u = u;
        Ok(st.y)
    }

    fn reset_state(&mut self) {
        self.state = TrueDelayState::default();
    }

    fn state(&self) -> TrueDelayState {
        self.state
    }

    fn set_state(&mut self, state: TrueDelayState) {
        self.state = state;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrueFalseHoldState {
    pub y: bool,
    /// Time the output last changed; `None` before the first call.
    pub entry_time: Option<f64>,
}

/// Minimum on/off hold.
///
/// After switching to true the output stays true for at least
/// `true_hold_duration`; after switching to false it stays false for at least
/// `false_hold_duration`. The first call adopts the input directly.
#[derive(Debug, Clone)]
pub struct TrueFalseHold {
    pub true_hold_duration: f64,
    pub false_hold_duration: f64,
    time: TimeSource,
    state: TrueFalseHoldState,
}

impl TrueFalseHold {
    pub fn new(
        time: impl Into<TimeSource>,
        true_hold_duration: f64,
        false_hold_duration: f64,
    ) -> CdlResult<Self> {
        Ok(Self {
            true_hold_duration: ensure_non_negative(
                true_hold_duration,
                Self::NAME,
                "trueHoldDuration must be >= 0",
            )?,
            false_hold_duration: ensure_non_negative(
                false_hold_duration,
                Self::NAME,
                "falseHoldDuration must be >= 0",
            )?,
            time: time.into(),
            state: TrueFalseHoldState::default(),
        })
    }

    /// Same hold duration in both directions.
    pub fn symmetric(time: impl Into<TimeSource>, hold_duration: f64) -> CdlResult<Self> {
        Self::new(time, hold_duration, hold_duration)
    }
}

impl Block for TrueFalseHold {
    type Input = bool;
    type Output = bool;
    type State = TrueFalseHoldState;

    const NAME: &'static str = "TrueFalseHold";

    fn compute(&mut self, u: bool) -> CdlResult<bool> {
        let now = self.time.now(Self::NAME)?;
        let st = &mut self.state;

        let Some(entry) = st.entry_time else {
            st.y = u;
            st.entry_time = Some(now);
            return Ok(u);
        };

        if u != st.y {
            let hold = if st.y {
                self.true_hold_duration
            } else {
                self.false_hold_duration
            };
            if now - entry >= hold {
                st.y = u;
                st.entry_time = Some(now);
            }
        }
        Ok(st.y)
    }

    fn reset_state(&mut self) {
        self.state = TrueFalseHoldState::default();
    }

    fn state(&self) -> TrueFalseHoldState {
        self.state
    }

    fn set_state(&mut self, state: TrueFalseHoldState) {
        self.state = state;
    }
}
