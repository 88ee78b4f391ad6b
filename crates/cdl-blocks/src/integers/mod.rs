//! Integer blocks.

pub mod arithmetic;
pub mod change;
pub mod counter;
pub mod sources;
pub mod stage;

pub use arithmetic::{
    Abs, Add, AddParameter, Equal, GreaterEqual, GreaterEqualThreshold, Less, LessThreshold, Max,
    Min, MultiSum, Multiply, Subtract, Switch,
};
pub use change::{Change, ChangeOutput, IntegerPreviousInput};
pub use counter::{CounterInput, OnCounter, OnCounterState};
pub use sources::{Constant, Pulse, TimeTable};
pub use stage::{Stage, StageConfig, StageState};
