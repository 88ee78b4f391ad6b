//! Bistable blocks: set/clear latch and toggle.
//!
//! Clear dominates: while `clr` is true (level or rising edge) the output is
//! forced false regardless of `u`.

use cdl_core::CdlResult;
use serde::{Deserialize, Serialize};

use crate::block::{Block, rising};

/// Inputs of [`Latch`] and [`Toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatchInput {
    /// Set (latch) or toggle input.
    pub u: bool,
    /// Clear input.
    pub clr: bool,
}

impl LatchInput {
    pub fn new(u: bool, clr: bool) -> Self {
        Self { u, clr }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BistableState {
    pub y: bool,
    pub pre_u: bool,
    pub pre_clr: bool,
}

impl BistableState {
    /// Shared priority logic; `set` produces the new output when `u` rises.
    fn update(&mut self, input: LatchInput, set: impl FnOnce(bool) -> bool) -> bool {
        if input.clr || rising(self.pre_clr, input.clr) {
            self.y = false;
        } else if rising(self.pre_u, input.u) {
            self.y = set(self.y);
        }
        self.pre_u = input.u;
        self.pre_clr = input.clr;
        self.y
    }
}

/// Set/clear latch: true on a rising `u`, false while `clr`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Latch {
    state: BistableState,
}

impl Latch {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Block for Latch {
    type Input = LatchInput;
    type Output = bool;
    type State = BistableState;

    const NAME: &'static str = "Latch";

    fn compute(&mut self, input: LatchInput) -> CdlResult<bool> {
        Ok(self.state.update(input, |_| true))
    }

    fn reset_state(&mut self) {
        self.state = BistableState::default();
    }

    fn state(&self) -> BistableState {
        self.state
    }

    fn set_state(&mut self, state: BistableState) {
        self.state = state;
    }
}

/// Toggle: flips on each rising `u`, false while `clr`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Toggle {
    state: BistableState,
}

impl Toggle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Block for Toggle {
    type Input = LatchInput;
    type Output = bool;
    type State = BistableState;

    const NAME: &'static str = "Toggle";

    fn compute(&mut self, input: LatchInput) -> CdlResult<bool> {
        Ok(self.state.update(input, |y| !y))
    }

    fn reset_state(&mut self) {
        self.state = BistableState::default();
    }

    fn state(&self) -> BistableState {
        self.state
    }

    fn set_state(&mut self, state: BistableState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_sets_and_holds() {
        let mut latch = Latch::new();
        assert!(!latch.compute(LatchInput::new(false, false)).unwrap());
        assert!(latch.compute(LatchInput::new(true, false)).unwrap());
        assert!(latch.compute(LatchInput::new(false, false)).unwrap());
        assert!(latch.compute(LatchInput::new(true, false)).unwrap());
    }

    #[test]
    fn latch_clear_dominates() {
        let mut latch = Latch::new();
        latch.compute(LatchInput::new(true, false)).unwrap();
        assert!(!latch.compute(LatchInput::new(true, true)).unwrap());
        // clr held high keeps it cleared even with a fresh rising u
        latch.compute(LatchInput::new(false, true)).unwrap();
        assert!(!latch.compute(LatchInput::new(true, true)).unwrap());
        // u already high when clr drops: no new rising edge
        assert!(!latch.compute(LatchInput::new(true, false)).unwrap());
    }

    #[test]
    fn toggle_flips_on_rising_edges() {
        let mut toggle = Toggle::new();
        let seq = [true, false, true, true, false, true];
        let ys: Vec<bool> = seq
            .iter()
            .map(|&u| toggle.compute(LatchInput::new(u, false)).unwrap())
            .collect();
        assert_eq!(ys, vec![true, true, false, false, false, true]);
    }

    #[test]
    fn toggle_clear_and_reset() {
        let mut toggle = Toggle::new();
        toggle.compute(LatchInput::new(true, false)).unwrap();
        assert!(!toggle.compute(LatchInput::new(false, true)).unwrap());
        toggle.compute(LatchInput::new(true, false)).unwrap();
        toggle.reset_state();
        assert_eq!(toggle.state(), BistableState::default());
    }
}
