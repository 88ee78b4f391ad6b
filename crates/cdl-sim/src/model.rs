//! ControlModel trait and per-block state snapshots.

use std::collections::BTreeMap;

use cdl_blocks::Block;
use cdl_core::CdlResult;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// A wired set of blocks evaluated once per step.
///
/// The model owns its blocks and reads time through whatever
/// [`cdl_core::TimeManager`] those blocks were built with; the driver only
/// advances that manager between steps.
pub trait ControlModel {
    /// Values of interest produced by one step.
    type Output: Clone;

    /// Evaluate every block once at the current time.
    fn step(&mut self) -> CdlResult<Self::Output>;

    /// Capture the state of every block.
    fn snapshot(&self) -> SimResult<BlockSnapshot>;

    /// Restore every block from a snapshot taken by [`Self::snapshot`].
    fn restore(&mut self, snapshot: &BlockSnapshot) -> SimResult<()>;
}

/// Block states keyed by instance name, stored as JSON values so models with
/// heterogeneous blocks share one container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockSnapshot {
    blocks: BTreeMap<String, serde_json::Value>,
}

impl BlockSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current state of `block` under `name`, replacing any
    /// earlier entry.
    pub fn insert<B: Block>(&mut self, name: impl Into<String>, block: &B) -> SimResult<()> {
        let value = serde_json::to_value(block.state())?;
        self.blocks.insert(name.into(), value);
        Ok(())
    }

    /// Load the state stored under `name` into `block`.
    pub fn restore<B: Block>(&self, name: &str, block: &mut B) -> SimResult<()> {
        let value = self
            .blocks
            .get(name)
            .ok_or_else(|| SimError::MissingBlockState {
                name: name.to_string(),
            })?;
        let state: B::State = serde_json::from_value(value.clone())?;
        block.set_state(state);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.blocks.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
