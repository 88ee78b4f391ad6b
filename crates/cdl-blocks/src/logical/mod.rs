//! Boolean blocks: gates, edge detectors, bistables, timers and sources.

pub mod edge;
pub mod gates;
pub mod hold;
pub mod latch;
pub mod proof;
pub mod pulse;
pub mod sources;
pub mod timer;

pub use edge::{Change, Edge, FallingEdge, Pre, PreviousInput};
pub use gates::{And, MultiAnd, MultiOr, Nand, Nor, Not, Or, Switch, SwitchInput, Xor};
pub use hold::{TrueDelay, TrueDelayState, TrueFalseHold, TrueFalseHoldState};
pub use latch::{BistableState, Latch, LatchInput, Toggle};
pub use proof::{Proof, ProofInput, ProofOutput, ProofState};
pub use pulse::{VariablePulse, VariablePulseState};
pub use sources::{Constant, Pulse, PulseShape, SampleTrigger, SampleTriggerState, TimeTable};
pub use timer::{
    Timer, TimerAccumulating, TimerAccumulatingInput, TimerAccumulatingState, TimerOutput,
    TimerState,
};
