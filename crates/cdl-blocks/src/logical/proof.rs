//! Proof of a commanded boolean (status matches command, stuck on/off).

use cdl_core::{CdlResult, ensure_non_negative};
use serde::{Deserialize, Serialize};

use crate::block::{Block, TimeSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProofInput {
    /// Measured status.
    pub u: bool,
    /// Commanded setpoint.
    pub u_set: bool,
}

impl ProofInput {
    pub fn new(u: bool, u_set: bool) -> Self {
        Self { u, u_set }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProofOutput {
    /// Status agrees with the setpoint; forced true inside the test delay.
    pub y_test: bool,
    /// Status stuck true for at least `del_tim`.
    pub y_loc_on: bool,
    /// Status stuck false for at least `del_tim`.
    pub y_loc_off: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProofState {
    pub pre_u: Option<bool>,
    pub pre_u_set: bool,
    pub setpoint_change_time: f64,
    pub became_true_time: Option<f64>,
    pub became_false_time: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Proof {
    /// Test delay after a setpoint change (seconds).
    pub del_tes: f64,
    /// Stuck detection time (seconds).
    pub del_tim: f64,
    time: TimeSource,
    state: ProofState,
}

impl Proof {
    pub const DEFAULT_DEL_TES: f64 = 180.0;
    pub const DEFAULT_DEL_TIM: f64 = 3600.0;

    pub fn new(time: impl Into<TimeSource>, del_tes: f64, del_tim: f64) -> CdlResult<Self> {
        Ok(Self {
            del_tes: ensure_non_negative(del_tes, Self::NAME, "delTes must be >= 0")?,
            del_tim: ensure_non_negative(del_tim, Self::NAME, "delTim must be >= 0")?,
            time: time.into(),
            state: ProofState::default(),
        })
    }

    pub fn with_defaults(time: impl Into<TimeSource>) -> CdlResult<Self> {
        Self::new(time, Self::DEFAULT_DEL_TES, Self::DEFAULT_DEL_TIM)
    }
}

impl Block for Proof {
    type Input = ProofInput;
    type Output = ProofOutput;
    type State = ProofState;

    const NAME: &'static str = "Proof";

    fn compute(&mut self, input: ProofInput) -> CdlResult<ProofOutput> {
        let now = self.time.now(Self::NAME)?;
        let st = &mut self.state;
        let ProofInput { u, u_set } = input;

        match st.pre_u {
            None => {
                st.pre_u_set = u_set;
                st.setpoint_change_time = now;
                if u {
                    st.became_true_time = Some(now);
                } else {
                    st.became_false_time = Some(now);
                }
            }
            Some(pre_u) => {
                if u && !pre_u {
                    st.became_true_time = Some(now);
                } else if !u && pre_u {
                    st.became_false_time = Some(now);
                }
            }
        }
        st.pre_u = Some(u);

        if u_set != st.pre_u_set {
            st.setpoint_change_time = now;
            st.pre_u_set = u_set;
        }

        let y_test = now - st.setpoint_change_time < self.del_tes || u == u_set;
        let stuck = |since: Option<f64>| since.is_some_and(|t0| now - t0 >= self.del_tim);
        Ok(ProofOutput {
            y_test,
            y_loc_on: u && stuck(st.became_true_time),
            y_loc_off: !u && stuck(st.became_false_time),
        })
    }

    fn reset_state(&mut self) {
        self.state = ProofState::default();
    }

    fn state(&self) -> ProofState {
        self.state
    }

    fn set_state(&mut self, state: ProofState) {
        self.state = state;
    }
}
