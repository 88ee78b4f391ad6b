//! Fixed-step driver and checkpointing for CDL block models.
//!
//! Provides:
//! - `ControlModel` trait for a wired set of blocks
//! - `BlockSnapshot` container of per-block state
//! - Fixed-step run loop advancing a shared `TimeManager`
//! - JSON checkpoints with periodic auto-save and pruning

pub mod checkpoint;
pub mod error;
pub mod model;
pub mod sim;

pub use checkpoint::{AutoCheckpointer, Checkpoint, CheckpointManager};
pub use error::{SimError, SimResult};
pub use model::{BlockSnapshot, ControlModel};
pub use sim::{SimOptions, SimRecord, run_sim, run_sim_with_hook};
