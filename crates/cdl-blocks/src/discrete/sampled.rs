//! Periodic sampling blocks.
//!
//! Every block here schedules samples on the grid `start_time + k * period`.
//! When the driver jumps over several grid points in one step the schedule
//! catches up by whole periods, so the next sample time always lies strictly
//! after the current time.

use cdl_core::{CdlResult, ensure_finite, ensure_positive};
use serde::{Deserialize, Serialize};

use crate::block::{Block, TimeSource};

/// Tracks when the next sample is due.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleClock {
    /// Sample period in seconds.
    pub period: f64,
    /// Time of next scheduled sample.
    pub next_sample_time: f64,
}

impl SampleClock {
    /// First sample is due at `start_time` itself.
    pub fn new(period: f64, start_time: f64) -> Self {
        Self {
            period,
            next_sample_time: start_time,
        }
    }

    pub fn should_sample(&self, current_time: f64) -> bool {
        current_time >= self.next_sample_time
    }

    /// Move the schedule past `current_time` in whole periods.
    pub fn catch_up(&mut self, current_time: f64) {
        while self.next_sample_time <= current_time {
            self.next_sample_time += self.period;
        }
    }

    /// Sample if due; returns `true` when a sample was taken.
    pub fn tick(&mut self, current_time: f64) -> bool {
        if self.should_sample(current_time) {
            self.catch_up(current_time);
            true
        } else {
            false
        }
    }

    pub fn time_until_sample(&self, current_time: f64) -> f64 {
        (self.next_sample_time - current_time).max(0.0)
    }
}

fn validated_clock(block: &'static str, period: f64, start_time: f64) -> CdlResult<SampleClock> {
    let period = ensure_positive(period, block, "samplePeriod must be > 0")?;
    let start_time = ensure_finite(start_time, "startTime")?;
    Ok(SampleClock::new(period, start_time))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplerState {
    pub clock: SampleClock,
    pub value: f64,
    pub initialized: bool,
}

/// Ideal sampler.
///
/// The very first call always captures `u`, even if it comes before
/// `start_time`; afterwards `u` is captured only on schedule and held in
/// between.
#[derive(Debug, Clone)]
pub struct Sampler {
    pub sample_period: f64,
    pub start_time: f64,
    time: TimeSource,
    state: SamplerState,
}

impl Sampler {
    pub fn new(time: impl Into<TimeSource>, sample_period: f64, start_time: f64) -> CdlResult<Self> {
        let clock = validated_clock(Self::NAME, sample_period, start_time)?;
        Ok(Self {
            sample_period,
            start_time,
            time: time.into(),
            state: SamplerState {
                clock,
                value: 0.0,
                initialized: false,
            },
        })
    }
}

impl Block for Sampler {
    type Input = f64;
    type Output = f64;
    type State = SamplerState;

    const NAME: &'static str = "Sampler";

    fn compute(&mut self, u: f64) -> CdlResult<f64> {
        let now = self.time.now(Self::NAME)?;
        let st = &mut self.state;
        let due = st.clock.tick(now);
        if due || !st.initialized {
            st.value = u;
            st.initialized = true;
        }
        Ok(st.value)
    }

    fn reset_state(&mut self) {
        self.state = SamplerState {
            clock: SampleClock::new(self.sample_period, self.start_time),
            value: 0.0,
            initialized: false,
        };
    }

    fn state(&self) -> SamplerState {
        self.state
    }

    fn set_state(&mut self, state: SamplerState) {
        self.state = state;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZeroOrderHoldState {
    pub clock: SampleClock,
    /// `None` until the first scheduled sample.
    pub held: Option<f64>,
}

/// Zero-order hold.
///
/// Passes `u` straight through until the first scheduled sample, then holds
/// the last sample.
#[derive(Debug, Clone)]
pub struct ZeroOrderHold {
    pub sample_period: f64,
    pub start_time: f64,
    time: TimeSource,
    state: ZeroOrderHoldState,
}

impl ZeroOrderHold {
    pub fn new(time: impl Into<TimeSource>, sample_period: f64, start_time: f64) -> CdlResult<Self> {
        let clock = validated_clock(Self::NAME, sample_period, start_time)?;
        Ok(Self {
            sample_period,
            start_time,
            time: time.into(),
            state: ZeroOrderHoldState { clock, held: None },
        })
    }
}

impl Block for ZeroOrderHold {
    type Input = f64;
    type Output = f64;
    type State = ZeroOrderHoldState;

    const NAME: &'static str = "ZeroOrderHold";

    fn compute(&mut self, u: f64) -> CdlResult<f64> {
        let now = self.time.now(Self::NAME)?;
        if self.state.clock.tick(now) {
            self.state.held = Some(u);
        }
        Ok(self.state.held.unwrap_or(u))
    }

    fn reset_state(&mut self) {
        self.state = ZeroOrderHoldState {
            clock: SampleClock::new(self.sample_period, self.start_time),
            held: None,
        };
    }

    fn state(&self) -> ZeroOrderHoldState {
        self.state
    }

    fn set_state(&mut self, state: ZeroOrderHoldState) {
        self.state = state;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirstOrderHoldState {
    pub clock: SampleClock,
    pub current: Option<f64>,
    pub previous: Option<f64>,
    pub current_sample_time: f64,
}

/// First-order hold: linear extrapolation from the last two samples.
///
/// Before the first sample the input passes through; with a single sample
/// the output holds it.
#[derive(Debug, Clone)]
pub struct FirstOrderHold {
    pub sample_period: f64,
    pub start_time: f64,
    time: TimeSource,
    state: FirstOrderHoldState,
}

impl FirstOrderHold {
    pub fn new(time: impl Into<TimeSource>, sample_period: f64, start_time: f64) -> CdlResult<Self> {
        let clock = validated_clock(Self::NAME, sample_period, start_time)?;
        Ok(Self {
            sample_period,
            start_time,
            time: time.into(),
            state: Self::initial(clock),
        })
    }

    fn initial(clock: SampleClock) -> FirstOrderHoldState {
        FirstOrderHoldState {
            clock,
            current: None,
            previous: None,
            current_sample_time: clock.next_sample_time,
        }
    }
}

impl Block for FirstOrderHold {
    type Input = f64;
    type Output = f64;
    type State = FirstOrderHoldState;

    const NAME: &'static str = "FirstOrderHold";

    fn compute(&mut self, u: f64) -> CdlResult<f64> {
        let now = self.time.now(Self::NAME)?;
        let st = &mut self.state;

        if st.clock.tick(now) {
            if st.current.is_some() {
                st.previous = st.current;
            }
            st.current = Some(u);
            st.current_sample_time = now;
        }

        let y = match (st.current, st.previous) {
            (None, _) => u,
            (Some(cur), None) => cur,
            (Some(cur), Some(prev)) => {
                let slope = (cur - prev) / self.sample_period;
                cur + slope * (now - st.current_sample_time)
            }
        };
        Ok(y)
    }

    fn reset_state(&mut self) {
        self.state = Self::initial(SampleClock::new(self.sample_period, self.start_time));
    }

    fn state(&self) -> FirstOrderHoldState {
        self.state
    }

    fn set_state(&mut self, state: FirstOrderHoldState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdl_core::TimeManager;
    use std::sync::Arc;

    fn clock_at(t: f64) -> Arc<TimeManager> {
        Arc::new(TimeManager::new(cdl_core::ExecutionMode::Simulation, Some(t), None))
    }

    #[test]
    fn sample_clock_catches_up_whole_periods() {
        let mut clock = SampleClock::new(0.5, 0.0);
        assert!(clock.tick(0.0));
        assert_eq!(clock.next_sample_time, 0.5);
        assert!(!clock.tick(0.3));
        assert!((clock.time_until_sample(0.3) - 0.2).abs() < 1e-12);
        assert!(clock.tick(2.2));
        assert_eq!(clock.next_sample_time, 2.5);
    }

    #[test]
    fn zero_order_hold_scenario() {
        let tm = clock_at(0.0);
        let mut zoh = ZeroOrderHold::new(&tm, 1.0, 0.0).unwrap();
        assert_eq!(zoh.compute(10.0).unwrap(), 10.0);
        tm.advance(Some(0.5)).unwrap();
        assert_eq!(zoh.compute(20.0).unwrap(), 10.0);
        tm.advance(Some(0.5)).unwrap();
        assert_eq!(zoh.compute(30.0).unwrap(), 30.0);
    }

    #[test]
    fn zero_order_hold_passes_through_before_start() {
        let tm = clock_at(0.0);
        let mut zoh = ZeroOrderHold::new(&tm, 1.0, 2.0).unwrap();
        assert_eq!(zoh.compute(1.0).unwrap(), 1.0);
        tm.advance(Some(1.0)).unwrap();
        assert_eq!(zoh.compute(2.0).unwrap(), 2.0);
        tm.advance(Some(1.0)).unwrap();
        assert_eq!(zoh.compute(3.0).unwrap(), 3.0);
        tm.advance(Some(0.5)).unwrap();
        assert_eq!(zoh.compute(4.0).unwrap(), 3.0);
    }

    #[test]
    fn sampler_captures_first_call_before_start() {
        let tm = clock_at(0.0);
        let mut sampler = Sampler::new(&tm, 1.0, 2.0).unwrap();
        assert_eq!(sampler.compute(1.0).unwrap(), 1.0);
        tm.advance(Some(1.0)).unwrap();
        // held, unlike the zero-order hold
        assert_eq!(sampler.compute(2.0).unwrap(), 1.0);
        tm.advance(Some(1.0)).unwrap();
        assert_eq!(sampler.compute(3.0).unwrap(), 3.0);
    }

    #[test]
    fn first_order_hold_extrapolates() {
        let tm = clock_at(0.0);
        let mut foh = FirstOrderHold::new(&tm, 1.0, 0.0).unwrap();
        assert_eq!(foh.compute(0.0).unwrap(), 0.0); // first sample
        tm.advance(Some(0.5)).unwrap();
        assert_eq!(foh.compute(5.0).unwrap(), 0.0); // hold single sample
        tm.advance(Some(0.5)).unwrap();
        assert_eq!(foh.compute(2.0).unwrap(), 2.0); // second sample at t=1
        tm.advance(Some(0.5)).unwrap();
        // slope 2/s from (0 -> 2)
        assert!((foh.compute(100.0).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn reset_restores_schedule() {
        let tm = clock_at(0.0);
        let mut zoh = ZeroOrderHold::new(&tm, 1.0, 0.0).unwrap();
        tm.advance(Some(3.0)).unwrap();
        zoh.compute(1.0).unwrap();
        zoh.reset_state();
        assert_eq!(zoh.state().clock.next_sample_time, 0.0);
        assert_eq!(zoh.state().held, None);
    }

    #[test]
    fn rejects_non_positive_period() {
        assert!(Sampler::new(TimeSource::none(), 0.0, 0.0).unwrap_err().is_configuration());
        assert!(ZeroOrderHold::new(TimeSource::none(), -1.0, 0.0).is_err());
        assert!(FirstOrderHold::new(TimeSource::none(), 0.0, 0.0).is_err());
    }
}
