//! Rate limiting of a real signal.

use cdl_core::{CdlResult, ensure_positive};
use serde::{Deserialize, Serialize};

use crate::block::{Block, TimeSource};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LimitSlewRateState {
    pub y: f64,
    /// `None` until the first call.
    pub last_time: Option<f64>,
}

/// Rate limiter: `y` follows `u` but moves at most
/// `raising_slew_rate * dt` up or `falling_slew_rate * dt` down per call.
///
/// The first call adopts `u` unlimited since there is no elapsed time to
/// scale the limits by.
#[derive(Debug, Clone)]
pub struct LimitSlewRate {
    /// Maximum rate of increase (units/s).
    pub raising_slew_rate: f64,
    /// Maximum rate of decrease (units/s, positive).
    pub falling_slew_rate: f64,
    time: TimeSource,
    state: LimitSlewRateState,
}

impl LimitSlewRate {
    pub fn new(
        time: impl Into<TimeSource>,
        raising_slew_rate: f64,
        falling_slew_rate: f64,
    ) -> CdlResult<Self> {
        Ok(Self {
            raising_slew_rate: ensure_positive(
                raising_slew_rate,
                Self::NAME,
                "raisingSlewRate must be > 0",
            )?,
            falling_slew_rate: ensure_positive(
                falling_slew_rate,
                Self::NAME,
                "fallingSlewRate must be > 0",
            )?,
            time: time.into(),
            state: LimitSlewRateState::default(),
        })
    }

    /// Same limit in both directions.
    pub fn symmetric(time: impl Into<TimeSource>, rate: f64) -> CdlResult<Self> {
        Self::new(time, rate, rate)
    }
}

impl Block for LimitSlewRate {
    type Input = f64;
    type Output = f64;
    type State = LimitSlewRateState;

    const NAME: &'static str = "LimitSlewRate";

    fn compute(&mut self, u: f64) -> CdlResult<f64> {
        let now = self.time.now(Self::NAME)?;
        let st = &mut self.state;
        match st.last_time {
            None => st.y = u,
            Some(last) => {
                let dt = now - last;
                if dt > 0.0 {
                    let delta = (u - st.y)
                        .clamp(-self.falling_slew_rate * dt, self.raising_slew_rate * dt);
                    st.y += delta;
                }
            }
        }
        st.last_time = Some(now);
        Ok(st.y)
    }

    fn reset_state(&mut self) {
        self.state = LimitSlewRateState::default();
    }

    fn state(&self) -> LimitSlewRateState {
        self.state
    }

    fn set_state(&mut self, state: LimitSlewRateState) {
        self.state = state;
    }
}
