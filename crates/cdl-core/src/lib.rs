//! cdl-core: shared foundation for the CDL block library.
//!
//! Contains:
//! - error (configuration / time-source / domain error taxonomy)
//! - numeric (Real + parameter validation + floored modulo)
//! - units (uom SI types used by the psychrometric blocks)
//! - time (the `TimeManager` shared by all time-dependent blocks)

pub mod error;
pub mod numeric;
pub mod time;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CdlError, CdlResult};
pub use numeric::*;
pub use time::{ExecutionMode, TimeManager, TimeState, TimeStatePatch};
pub use units::*;
