//! Detection of integer signal changes.

use cdl_core::CdlResult;
use serde::{Deserialize, Serialize};

use crate::block::Block;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeOutput {
    pub y: bool,
    pub up: bool,
    pub down: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegerPreviousInput {
    pub pre_u: i64,
}

/// Integer change detector with direction outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub pre_u_start: i64,
    state: IntegerPreviousInput,
}

impl Change {
    pub fn new(pre_u_start: i64) -> Self {
        Self {
            pre_u_start,
            state: IntegerPreviousInput { pre_u: pre_u_start },
        }
    }
}

impl Default for Change {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Block for Change {
    type Input = i64;
    type Output = ChangeOutput;
    type State = IntegerPreviousInput;

    const NAME: &'static str = "IntegerChange";

    fn compute(&mut self, u: i64) -> CdlResult<ChangeOutput> {
        let pre = self.state.pre_u;
        self.state.pre_u = u;
        Ok(ChangeOutput {
            y: u != pre,
            up: u > pre,
            down: u < pre,
        })
    }

    fn reset_state(&mut self) {
        self.state = IntegerPreviousInput {
            pre_u: self.pre_u_start,
        };
    }

    fn state(&self) -> IntegerPreviousInput {
        self.state
    }

    fn set_state(&mut self, state: IntegerPreviousInput) {
        self.state = state;
    }
}
