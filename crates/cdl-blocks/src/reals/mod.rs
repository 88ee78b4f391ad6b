//! Real-valued blocks.

pub mod calendar;
pub mod controller;
pub mod derivative;
pub mod hysteresis;
pub mod integrator;
pub mod math;
pub mod matrix;
pub mod moving_average;
pub mod slew;
pub mod sources;

pub use calendar::{CalendarTime, CalendarTimeOutput, ZeroTime};
pub use controller::{ControllerType, Pid, PidConfig, PidInput, PidState};
pub use derivative::{Derivative, DerivativeState};
pub use hysteresis::{
    ComparatorState, Greater, GreaterThreshold, Hysteresis, Less, LessThreshold,
};
pub use integrator::{IntegratorInput, IntegratorState, IntegratorWithReset};
pub use math::{
    Abs, Acos, Add, AddParameter, Asin, Atan, Atan2, Average, Cos, Divide, Exp, Limiter, Line,
    LineInput, Log, Log10, Max, Min, Modulo, MultiMax, MultiMin, MultiSum, Multiply,
    MultiplyByParameter, Round, Sin, Sqrt, Subtract, Switch, Tan,
};
pub use matrix::{MatrixGain, MatrixMax, MatrixMin, Sort, SortOutput};
pub use moving_average::{MovingAverage, MovingAverageState};
pub use slew::{LimitSlewRate, LimitSlewRateState};
pub use sources::{
    CivilTime, Constant, Extrapolation, Pulse, Ramp, Sin as SinSource, Smoothness, TimeTable,
    TimeTableConfig,
};
