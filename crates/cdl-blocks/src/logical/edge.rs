//! Boolean edge and level detectors.
//!
//! Each detector computes its output from the previous input and only then
//! stores the new input. The previous input is seeded from `pre_u_start`,
//! never from the first real input.

use cdl_core::CdlResult;
use serde::{Deserialize, Serialize};

use crate::block::{Block, falling, rising};

/// Previous-input record shared by the boolean detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousInput {
    pub pre_u: bool,
}

/// Generate a detector whose output is a function of `(pre_u, u)`.
macro_rules! previous_input {
    (
        $(#[$meta:meta])*
        $name:ident,
        |$pre:ident, $u:ident| $y:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub pre_u_start: bool,
            state: PreviousInput,
        }

        impl $name {
            pub fn new(pre_u_start: bool) -> Self {
                Self {
                    pre_u_start,
                    state: PreviousInput { pre_u: pre_u_start },
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new(false)
            }
        }

        impl Block for $name {
            type Input = bool;
            type Output = bool;
            type State = PreviousInput;

            const NAME: &'static str = stringify!($name);

            fn compute(&mut self, $u: bool) -> CdlResult<bool> {
                let $pre = self.state.pre_u;
                self.state.pre_u = $u;
                Ok($y)
            }

            fn reset_state(&mut self) {
                self.state = PreviousInput {
                    pre_u: self.pre_u_start,
                };
            }

            fn state(&self) -> PreviousInput {
                self.state
            }

            fn set_state(&mut self, state: PreviousInput) {
                self.state = state;
            }
        }
    };
}

previous_input!(
    /// Rising edge detector: `y = !pre(u) && u`.
    Edge,
    |pre_u, u| rising(pre_u, u)
);

previous_input!(
    /// Falling edge detector: `y = pre(u) && !u`.
    FallingEdge,
    |pre_u, u| falling(pre_u, u)
);

previous_input!(
    /// Boolean change detector: `y = u != pre(u)`.
    Change,
    |pre_u, u| u != pre_u
);

previous_input!(
    /// One-step boolean delay: `y = pre(u)`.
    ///
    /// Never looks at the clock; the output is the input of the previous call.
    Pre,
    |pre_u, _u| pre_u
);
