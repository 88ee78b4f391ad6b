//! Approximate derivative from successive samples.

use cdl_core::{CdlResult, ensure_positive};
use serde::{Deserialize, Serialize};

use crate::block::{Block, TimeSource};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivativeState {
    pub y: f64,
    /// Previous input and its timestamp.
    pub previous: Option<(f64, f64)>,
}

/// Backward-difference derivative clamped to `[-y_max, y_max]`.
///
/// Outputs `y_start` on the first call; a call with `dt <= 0` repeats the
/// last output.
#[derive(Debug, Clone)]
pub struct Derivative {
    pub y_max: f64,
    pub y_start: f64,
    time: TimeSource,
    state: DerivativeState,
}

impl Derivative {
    pub fn new(time: impl Into<TimeSource>, y_max: f64, y_start: f64) -> CdlResult<Self> {
        Ok(Self {
            y_max: ensure_positive(y_max, Self::NAME, "y_max must be > 0")?,
            y_start,
            time: time.into(),
            state: DerivativeState {
                y: y_start,
                previous: None,
            },
        })
    }

    /// No output limit.
    pub fn unlimited(time: impl Into<TimeSource>) -> CdlResult<Self> {
        Self::new(time, f64::INFINITY, 0.0)
    }
}

impl Block for Derivative {
    type Input = f64;
    type Output = f64;
    type State = DerivativeState;

    const NAME: &'static str = "Derivative";

    fn compute(&mut self, u: f64) -> CdlResult<f64> {
        let now = self.time.now(Self::NAME)?;
        let st = &mut self.state;
        match st.previous {
            None => st.y = self.y_start,
            Some((pre_u, pre_t)) => {
                let dt = now - pre_t;
                if dt > 0.0 {
                    st.y = ((u - pre_u) / dt).clamp(-self.y_max, self.y_max);
                }
            }
        }
        st.previous = Some((u, now));
        Ok(st.y)
    }

    fn reset_state(&mut self) {
        self.state = DerivativeState {
            y: self.y_start,
            previous: None,
        };
    }

    fn state(&self) -> DerivativeState {
        self.state
    }

    fn set_state(&mut self, state: DerivativeState) {
        self.state = state;
    }
}
