//! Edge counting.

use cdl_core::{CdlError, CdlResult};
use serde::{Deserialize, Serialize};

use crate::block::{Block, rising};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterInput {
    pub trigger: bool,
    /// Level-sensitive; dominates `trigger`.
    pub reset: bool,
}

impl CounterInput {
    pub fn new(trigger: bool, reset: bool) -> Self {
        Self { trigger, reset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnCounterState {
    pub y: i64,
    pub pre_trigger: bool,
}

/// Counts rising trigger edges; `reset` forces the count back to `y_start`.
#[derive(Debug, Clone, PartialEq)]
pub struct OnCounter {
    pub y_start: i64,
    state: OnCounterState,
}

impl OnCounter {
    pub fn new(y_start: i64) -> Self {
        Self {
            y_start,
            state: Self::initial(y_start),
        }
    }

    fn initial(y_start: i64) -> OnCounterState {
        OnCounterState {
            y: y_start,
            pre_trigger: false,
        }
    }
}

impl Default for OnCounter {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Block for OnCounter {
    type Input = CounterInput;
    type Output = i64;
    type State = OnCounterState;

    const NAME: &'static str = "OnCounter";

    fn compute(&mut self, input: CounterInput) -> CdlResult<i64> {
        let st = &mut self.state;
        if input.reset {
            st.y = self.y_start;
        } else if rising(st.pre_trigger, input.trigger) {
            st.y = st
                .y
                .checked_add(1)
                .ok_or(CdlError::domain(Self::NAME, "count overflow", st.y as f64))?;
        }
        st.pre_trigger = input.trigger;
        Ok(st.y)
    }

    fn reset_state(&mut self) {
        self.state = Self::initial(self.y_start);
    }

    fn state(&self) -> OnCounterState {
        self.state
    }

    fn set_state(&mut self, state: OnCounterState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_rising_edges_only() {
        let mut counter = OnCounter::new(0);
        let ys: Vec<i64> = [true, true, false, true, false, true]
            .iter()
            .map(|&t| counter.compute(CounterInput::new(t, false)).unwrap())
            .collect();
        assert_eq!(ys, [1, 1, 1, 2, 2, 3]);
    }

    #[test]
    fn reset_level_dominates_trigger() {
        let mut counter = OnCounter::new(5);
        counter.compute(CounterInput::new(true, false)).unwrap();
        assert_eq!(counter.compute(CounterInput::new(false, true)).unwrap(), 5);
        // trigger edge while reset is held is ignored
        assert_eq!(counter.compute(CounterInput::new(true, true)).unwrap(), 5);
        // trigger still high when reset drops: no new edge
        assert_eq!(counter.compute(CounterInput::new(true, false)).unwrap(), 5);
        counter.compute(CounterInput::new(false, false)).unwrap();
        assert_eq!(counter.compute(CounterInput::new(true, false)).unwrap(), 6);
    }

    #[test]
    fn overflow_is_a_domain_error() {
        let mut counter = OnCounter::new(i64::MAX);
        let err = counter.compute(CounterInput::new(true, false)).unwrap_err();
        assert!(matches!(err, CdlError::Domain { block: "OnCounter", .. }));
    }
}
