//! Forward-Euler integrator with gain and triggered reset.

use cdl_core::{CdlResult, ensure_finite};
use serde::{Deserialize, Serialize};

use crate::block::{Block, TimeSource, rising};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntegratorInput {
    pub u: f64,
    /// Rising edge loads `y_reset_in`.
    pub trigger: bool,
    pub y_reset_in: f64,
}

impl IntegratorInput {
    pub fn new(u: f64, trigger: bool, y_reset_in: f64) -> Self {
        Self {
            u,
            trigger,
            y_reset_in,
        }
    }

    /// Plain integration step with the trigger low.
    pub fn value(u: f64) -> Self {
        Self::new(u, false, 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegratorState {
    pub y: f64,
    pub last_time: Option<f64>,
    pub pre_trigger: bool,
}

/// Forward-Euler integrator `y += k * u * dt` with a triggered reset.
///
/// The first call only records the time. A step with `dt <= 0` leaves `y`
/// unchanged, so repeated evaluation at one timestamp never double-counts.
#[derive(Debug, Clone)]
pub struct IntegratorWithReset {
    pub k: f64,
    pub y_start: f64,
    time: TimeSource,
    state: IntegratorState,
}

impl IntegratorWithReset {
    pub fn new(time: impl Into<TimeSource>, k: f64, y_start: f64) -> CdlResult<Self> {
        let k = ensure_finite(k, "IntegratorWithReset k")?;
        let y_start = ensure_finite(y_start, "IntegratorWithReset y_start")?;
        Ok(Self {
            k,
            y_start,
            time: time.into(),
            state: Self::initial(y_start),
        })
    }

    fn initial(y_start: f64) -> IntegratorState {
        IntegratorState {
            y: y_start,
            last_time: None,
            pre_trigger: false,
        }
    }
}

impl Block for IntegratorWithReset {
    type Input = IntegratorInput;
    type Output = f64;
    type State = IntegratorState;

    const NAME: &'static str = "IntegratorWithReset";

    fn compute(&mut self, input: IntegratorInput) -> CdlResult<f64> {
        let now = self.time.now(Self::NAME)?;
        let st = &mut self.state;

        if rising(st.pre_trigger, input.trigger) {
            st.y = input.y_reset_in;
        } else if let Some(last) = st.last_time {
            let dt = now - last;
            if dt > 0.0 {
                st.y += self.k * input.u * dt;
            }
        }
        st.last_time = Some(now);
        st.pre_trigger = input.trigger;
        Ok(st.y)
    }

    fn reset_state(&mut self) {
        self.state = Self::initial(self.y_start);
    }

    fn state(&self) -> IntegratorState {
        self.state
    }

    fn set_state(&mut self, state: IntegratorState) {
        self.state = state;
    }
}
