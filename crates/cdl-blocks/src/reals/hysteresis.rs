//! Real-to-boolean comparisons with hysteresis.
//!
//! All blocks here share one update rule: switch on when the strict
//! comparison holds, stay on while the comparison relaxed by the band still
//! holds. With a zero band they reduce to plain comparisons.

use cdl_core::{CdlError, CdlResult, ensure_non_negative};
use serde::{Deserialize, Serialize};

use crate::block::Block;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComparatorState {
    pub y: bool,
}

impl ComparatorState {
    fn update(&mut self, switch_on: bool, stay_on: bool) -> bool {
        self.y = (!self.y && switch_on) || (self.y && stay_on);
        self.y
    }
}

/// Two-threshold switch: on above `u_high`, off below `u_low`.
#[derive(Debug, Clone, PartialEq)]
pub struct Hysteresis {
    pub u_low: f64,
    pub u_high: f64,
    pub pre_y_start: bool,
    state: ComparatorState,
}

impl Hysteresis {
    pub fn new(u_low: f64, u_high: f64, pre_y_start: bool) -> CdlResult<Self> {
        if u_high <= u_low {
            return Err(CdlError::config(Self::NAME, "uHigh must be larger than uLow"));
        }
        Ok(Self {
            u_low,
            u_high,
            pre_y_start,
            state: ComparatorState { y: pre_y_start },
        })
    }
}

impl Block for Hysteresis {
    type Input = f64;
    type Output = bool;
    type State = ComparatorState;

    const NAME: &'static str = "Hysteresis";

    fn compute(&mut self, u: f64) -> CdlResult<bool> {
        Ok(self.state.update(u > self.u_high, u >= self.u_low))
    }

    fn reset_state(&mut self) {
        self.state = ComparatorState {
            y: self.pre_y_start,
        };
    }

    fn state(&self) -> ComparatorState {
        self.state
    }

    fn set_state(&mut self, state: ComparatorState) {
        self.state = state;
    }
}

macro_rules! comparator {
    (
        $(#[$meta:meta])*
        $name:ident { $($param:ident : $pty:ty),* },
        $input:ty,
        |$this:ident, $arg:pat_param| ($on:expr, $stay:expr)
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $(pub $param: $pty,)*
            /// Hysteresis band, `>= 0`.
            pub h: f64,
            pub pre_y_start: bool,
            state: ComparatorState,
        }

        impl $name {
            pub fn new($($param: $pty,)* h: f64, pre_y_start: bool) -> CdlResult<Self> {
                Ok(Self {
                    $($param,)*
                    h: ensure_non_negative(h, stringify!($name), "h must be >= 0")?,
                    pre_y_start,
                    state: ComparatorState { y: pre_y_start },
                })
            }
        }

        impl Block for $name {
            type Input = $input;
            type Output = bool;
            type State = ComparatorState;

            const NAME: &'static str = stringify!($name);

            fn compute(&mut self, input: $input) -> CdlResult<bool> {
                let $this = &*self;
                let $arg = input;
                let (on, stay) = ($on, $stay);
                Ok(self.state.update(on, stay))
            }

            fn reset_state(&mut self) {
                self.state = ComparatorState { y: self.pre_y_start };
            }

            fn state(&self) -> ComparatorState {
                self.state
            }

            fn set_state(&mut self, state: ComparatorState) {
                self.state = state;
            }
        }
    };
}

comparator!(
    /// `u1 > u2`, held while `u1 > u2 - h`.
    Greater {},
    (f64, f64),
    |this, (u1, u2)| (u1 > u2, u1 > u2 - this.h)
);

comparator!(
    /// `u1 < u2`, held while `u1 < u2 + h`.
    Less {},
    (f64, f64),
    |this, (u1, u2)| (u1 < u2, u1 < u2 + this.h)
);

comparator!(
    /// `u > t`, held while `u > t - h`.
    GreaterThreshold { t: f64 },
    f64,
    |this, u| (u > this.t, u > this.t - this.h)
);

comparator!(
    /// `u < t`, held while `u < t + h`.
    LessThreshold { t: f64 },
    f64,
    |this, u| (u < this.t, u < this.t + this.h)
);
