//! Elementary control blocks in the style of the Control Description Language.
//!
//! Every block implements [`Block`]: immutable parameters fixed at
//! construction, one `compute` per step, and a serializable state record
//! for checkpointing. Time-dependent blocks read the shared
//! [`cdl_core::TimeManager`] through a [`TimeSource`].
//!
//! # Families
//!
//! - `logical`: gates, edge detectors, latches, timers, holds, pulse sources
//! - `integers`: arithmetic, comparisons, counters, staging
//! - `reals`: math, comparators with hysteresis, integrator, PID, sources,
//!   time tables, calendar time, sorting and matrices
//! - `discrete`: samplers, holds, unit delay, triggered accumulators
//! - `routing`: extractors, replicators and vector filters for all three
//!   signal types
//! - `conversions`, `psychrometrics`, `utilities`
//!
//! Blocks that share a name across families (`Switch`, `Constant`, `Pulse`,
//! ...) are reached through their module path.

pub mod block;
pub mod conversions;
pub mod discrete;
pub mod integers;
pub mod logical;
pub mod psychrometrics;
pub mod reals;
pub mod routing;
mod table;
pub mod utilities;

pub use block::{Block, TimeSource, falling, rising};
pub use conversions::{BooleanToInteger, BooleanToReal, IntegerToReal, RealToInteger};
pub use psychrometrics::{DewPoint, DryBulbInput, SpecEnthalpy, SpecificEnthalpy, WetBulb};
pub use utilities::Assert;
