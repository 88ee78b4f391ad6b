//! Boolean pulse whose width follows a real input.

use cdl_core::{CdlResult, ensure_positive};
use serde::{Deserialize, Serialize};

use crate::block::{Block, TimeSource};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariablePulseState {
    pub active: bool,
    pub pulse_end_time: f64,
    pub next_pulse_time: f64,
    pub sampled_width: f64,
}

/// Periodic pulse whose width is sampled from `u` at every period boundary.
///
/// Boundaries fall on whole multiples of `period`, the first at
/// `t = period`. The width is clamped to `[0, period]` and measured from the
/// boundary itself, so a late call shortens the pulse rather than shifting it.
#[derive(Debug, Clone)]
pub struct VariablePulse {
    pub period: f64,
    time: TimeSource,
    state: VariablePulseState,
}

impl VariablePulse {
    pub fn new(time: impl Into<TimeSource>, period: f64) -> CdlResult<Self> {
        let period = ensure_positive(period, Self::NAME, "period must be > 0")?;
        Ok(Self {
            period,
            time: time.into(),
            state: Self::initial(period),
        })
    }

    fn initial(period: f64) -> VariablePulseState {
        VariablePulseState {
            active: false,
            pulse_end_time: 0.0,
            next_pulse_time: period,
            sampled_width: 0.0,
        }
    }
}

impl Block for VariablePulse {
    type Input = f64;
    type Output = bool;
    type State = VariablePulseState;

    const NAME: &'static str = "VariablePulse";

    fn compute(&mut self, u: f64) -> CdlResult<bool> {
        let now = self.time.now(Self::NAME)?;
        let st = &mut self.state;

        if now >= st.next_pulse_time {
            while st.next_pulse_time <= now {
                st.next_pulse_time += self.period;
            }
            let period_start = st.next_pulse_time - self.period;
            st.sampled_width = u.clamp(0.0, self.period);
            st.pulse_end_time = period_start + st.sampled_width;
            st.active = true;
        }
        if st.active && now >= st.pulse_end_time {
            st.active = false;
        }
        Ok(st.active)
    }

    fn reset_state(&mut self) {
        self.state = Self::initial(self.period);
    }

    fn state(&self) -> VariablePulseState {
        self.state
    }

    fn set_state(&mut self, state: VariablePulseState) {
        self.state = state;
    }
}
