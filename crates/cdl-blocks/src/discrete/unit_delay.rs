//! One-step delay of a real signal.

use cdl_core::CdlResult;
use serde::{Deserialize, Serialize};

use crate::block::Block;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitDelayState {
    pub pre_u: f64,
    pub first_call: bool,
}

/// One-call delay of a real signal: `[a0, a1, ..]` becomes `[y_start, a0, ..]`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDelay {
    pub y_start: f64,
    state: UnitDelayState,
}

impl UnitDelay {
    pub fn new(y_start: f64) -> Self {
        Self {
            y_start,
            state: Self::initial(y_start),
        }
    }

    fn initial(y_start: f64) -> UnitDelayState {
        UnitDelayState {
            pre_u: y_start,
            first_call: true,
        }
    }
}

impl Default for UnitDelay {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Block for UnitDelay {
    type Input = f64;
    type Output = f64;
    type State = UnitDelayState;

    const NAME: &'static str = "UnitDelay";

    fn compute(&mut self, u: f64) -> CdlResult<f64> {
        let y = if self.state.first_call {
            self.state.first_call = false;
            self.y_start
        } else {
            self.state.pre_u
        };
        self.state.pre_u = u;
        Ok(y)
    }

    fn reset_state(&mut self) {
        self.state = Self::initial(self.y_start);
    }

    fn state(&self) -> UnitDelayState {
        self.state
    }

    fn set_state(&mut self, state: UnitDelayState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_by_one_call() {
        let mut delay = UnitDelay::new(0.0);
        let ys: Vec<f64> = [1.0, 2.0, 3.0, 4.0, 5.0]
            .iter()
            .map(|&u| delay.compute(u).unwrap())
            .collect();
        assert_eq!(ys, [0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn reset_returns_to_y_start() {
        let mut delay = UnitDelay::new(-2.0);
        delay.compute(7.0).unwrap();
        delay.reset_state();
        assert_eq!(delay.compute(1.0).unwrap(), -2.0);
    }
}
