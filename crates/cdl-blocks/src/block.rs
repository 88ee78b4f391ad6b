//! The block contract shared by every elementary block.
//!
//! A block is constructed once from immutable parameters, then evaluated
//! through [`Block::compute`] once per step. Everything a block remembers
//! between calls lives in a typed state record that can be snapshotted and
//! restored for checkpointing.

use std::sync::Arc;

use cdl_core::{CdlError, CdlResult, TimeManager};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Uniform evaluation interface for all blocks.
pub trait Block {
    /// Named inputs consumed by one evaluation.
    type Input;
    /// Named outputs produced by one evaluation.
    type Output;
    /// Private state carried between evaluations.
    type State: Clone + Serialize + DeserializeOwned;

    /// Block name used in errors and logs.
    const NAME: &'static str;

    /// Evaluate the block for the current step.
    ///
    /// Either every output is produced or an error is returned; the state
    /// is only meaningful after a successful call.
    fn compute(&mut self, input: Self::Input) -> CdlResult<Self::Output>;

    /// Restore the state record to its construction-time defaults.
    fn reset_state(&mut self);

    /// Snapshot of the state record.
    fn state(&self) -> Self::State;

    /// Replace the state record (checkpoint restore).
    fn set_state(&mut self, state: Self::State);
}

/// Optional handle on the shared [`TimeManager`].
///
/// Time-dependent blocks hold one of these and ask it for the current time
/// on every evaluation. A detached source fails with
/// [`CdlError::MissingTimeSource`].
#[derive(Debug, Clone, Default)]
pub struct TimeSource(Option<Arc<TimeManager>>);

impl TimeSource {
    /// A detached source.
    pub fn none() -> Self {
        Self(None)
    }

    pub fn is_attached(&self) -> bool {
        self.0.is_some()
    }

    pub fn manager(&self) -> Option<&Arc<TimeManager>> {
        self.0.as_ref()
    }

    /// Current time, on behalf of `block`.
    pub fn now(&self, block: &'static str) -> CdlResult<f64> {
        self.0
            .as_ref()
            .map(|tm| tm.get_time())
            .ok_or(CdlError::MissingTimeSource { block })
    }
}

impl From<Arc<TimeManager>> for TimeSource {
    fn from(tm: Arc<TimeManager>) -> Self {
        Self(Some(tm))
    }
}

impl From<&Arc<TimeManager>> for TimeSource {
    fn from(tm: &Arc<TimeManager>) -> Self {
        Self(Some(Arc::clone(tm)))
    }
}

impl From<Option<Arc<TimeManager>>> for TimeSource {
    fn from(tm: Option<Arc<TimeManager>>) -> Self {
        Self(tm)
    }
}

/// `true` when `now` is a false-to-true transition from `prev`.
#[inline]
pub fn rising(prev: bool, now: bool) -> bool {
    now && !prev
}

/// `true` when `now` is a true-to-false transition from `prev`.
#[inline]
pub fn falling(prev: bool, now: bool) -> bool {
    prev && !now
}

/// Generate a block with no state whose output is a pure function of its input.
///
/// The closure receives the block (for parameters) and the input, and
/// returns `CdlResult<Output>`.
macro_rules! stateless_block {
    (
        $(#[$meta:meta])*
        $name:ident { $($field:ident : $fty:ty),* $(,)? },
        $input:ty => $output:ty,
        |$this:ident, $arg:pat_param| $body:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $(pub $field: $fty,)*
        }

        impl $crate::block::Block for $name {
            type Input = $input;
            type Output = $output;
            type State = ();

            const NAME: &'static str = stringify!($name);

            #[allow(unused_variables)]
            fn compute(&mut self, input: $input) -> cdl_core::CdlResult<$output> {
                let $this = &*self;
                let $arg = input;
                $body
            }

            fn reset_state(&mut self) {}

            fn state(&self) {}

            fn set_state(&mut self, _state: ()) {}
        }
    };
}

pub(crate) use stateless_block;
