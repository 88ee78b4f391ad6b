//! Discrete-time blocks: samplers, holds, unit delay and triggered accumulators.

pub mod sampled;
pub mod triggered;
pub mod unit_delay;

pub use sampled::{
    FirstOrderHold, FirstOrderHoldState, SampleClock, Sampler, SamplerState, ZeroOrderHold,
    ZeroOrderHoldState,
};
pub use triggered::{
    TriggeredInput, TriggeredMax, TriggeredMaxState, TriggeredMovingMean,
    TriggeredMovingMeanState, TriggeredSampler, TriggeredSamplerState,
};
pub use unit_delay::{UnitDelay, UnitDelayState};
