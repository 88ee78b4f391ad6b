//! Blocks that restart or sample on a rising trigger edge.

use cdl_core::CdlResult;
use serde::{Deserialize, Serialize};

use crate::block::{Block, rising};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriggeredInput {
    pub u: f64,
    pub trigger: bool,
}

impl TriggeredInput {
    pub fn new(u: f64, trigger: bool) -> Self {
        Self { u, trigger }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TriggeredMaxState {
    /// `None` before the first call.
    pub max: Option<f64>,
    pub pre_trigger: bool,
}

/// Running maximum of `u`, restarted on each rising trigger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggeredMax {
    state: TriggeredMaxState,
}

impl TriggeredMax {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Block for TriggeredMax {
    type Input = TriggeredInput;
    type Output = f64;
    type State = TriggeredMaxState;

    const NAME: &'static str = "TriggeredMax";

    fn compute(&mut self, input: TriggeredInput) -> CdlResult<f64> {
        let st = &mut self.state;
        let y = match st.max {
            Some(max) if !rising(st.pre_trigger, input.trigger) => max.max(input.u),
            _ => input.u,
        };
        st.max = Some(y);
        st.pre_trigger = input.trigger;
        Ok(y)
    }

    fn reset_state(&mut self) {
        self.state = TriggeredMaxState::default();
    }

    fn state(&self) -> TriggeredMaxState {
        self.state
    }

    fn set_state(&mut self, state: TriggeredMaxState) {
        self.state = state;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TriggeredMovingMeanState {
    pub sum: f64,
    pub count: u64,
    pub pre_trigger: bool,
}

/// Mean of `u` over all calls since the last rising trigger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggeredMovingMean {
    state: TriggeredMovingMeanState,
}

impl TriggeredMovingMean {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Block for TriggeredMovingMean {
    type Input = TriggeredInput;
    type Output = f64;
    type State = TriggeredMovingMeanState;

    const NAME: &'static str = "TriggeredMovingMean";

    fn compute(&mut self, input: TriggeredInput) -> CdlResult<f64> {
        let st = &mut self.state;
        if rising(st.pre_trigger, input.trigger) {
            st.sum = input.u;
            st.count = 1;
        } else {
            st.sum += input.u;
            st.count += 1;
        }
        st.pre_trigger = input.trigger;
        Ok(st.sum / st.count as f64)
    }

    fn reset_state(&mut self) {
        self.state = TriggeredMovingMeanState::default();
    }

    fn state(&self) -> TriggeredMovingMeanState {
        self.state
    }

    fn set_state(&mut self, state: TriggeredMovingMeanState) {
        self.state = state;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggeredSamplerState {
    pub value: f64,
    pub pre_trigger: bool,
}

/// Captures `u` on each rising trigger and holds it; `y_start` until then.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggeredSampler {
    pub y_start: f64,
    state: TriggeredSamplerState,
}

impl TriggeredSampler {
    pub fn new(y_start: f64) -> Self {
        Self {
            y_start,
            state: TriggeredSamplerState {
                value: y_start,
                pre_trigger: false,
            },
        }
    }
}

impl Default for TriggeredSampler {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Block for TriggeredSampler {
    type Input = TriggeredInput;
    type Output = f64;
    type State = TriggeredSamplerState;

    const NAME: &'static str = "TriggeredSampler";

    fn compute(&mut self, input: TriggeredInput) -> CdlResult<f64> {
        if rising(self.state.pre_trigger, input.trigger) {
            self.state.value = input.u;
        }
        self.state.pre_trigger = input.trigger;
        Ok(self.state.value)
    }

    fn reset_state(&mut self) {
        self.state = TriggeredSamplerState {
            value: self.y_start,
            pre_trigger: false,
        };
    }

    fn state(&self) -> TriggeredSamplerState {
        self.state
    }

    fn set_state(&mut self, state: TriggeredSamplerState) {
        self.state = state;
    }
}
