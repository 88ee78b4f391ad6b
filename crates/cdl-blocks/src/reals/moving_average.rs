//! Time-windowed moving average.

use std::collections::VecDeque;

use cdl_core::{CdlResult, ensure_positive};
use serde::{Deserialize, Serialize};

use crate::block::{Block, TimeSource};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MovingAverageState {
    /// `(timestamp, value)` samples inside the window, oldest first.
    pub window: VecDeque<(f64, f64)>,
}

/// Arithmetic mean of the samples taken during the last `delta` seconds.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    pub delta: f64,
    time: TimeSource,
    state: MovingAverageState,
}

impl MovingAverage {
    pub fn new(time: impl Into<TimeSource>, delta: f64) -> CdlResult<Self> {
        Ok(Self {
            delta: ensure_positive(delta, Self::NAME, "delta must be > 0")?,
            time: time.into(),
            state: MovingAverageState::default(),
        })
    }

    pub fn len(&self) -> usize {
        self.state.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.window.is_empty()
    }
}

impl Block for MovingAverage {
    type Input = f64;
    type Output = f64;
    type State = MovingAverageState;

    const NAME: &'static str = "MovingAverage";

    fn compute(&mut self, u: f64) -> CdlResult<f64> {
        let now = self.time.now(Self::NAME)?;
        let window = &mut self.state.window;
        window.push_back((now, u));

        let cutoff = now - self.delta;
        while window.front().is_some_and(|&(t, _)| t < cutoff) {
            window.pop_front();
        }

        if window.is_empty() {
            return Ok(u);
        }
        let sum: f64 = window.iter().map(|&(_, v)| v).sum();
        Ok(sum / window.len() as f64)
    }

    fn reset_state(&mut self) {
        self.state = MovingAverageState::default();
    }

    fn state(&self) -> MovingAverageState {
        self.state.clone()
    }

    fn set_state(&mut self, state: MovingAverageState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdl_core::TimeManager;
    use std::sync::Arc;

    #[test]
    fn averages_over_window() {
        let tm = Arc::new(TimeManager::simulation(1.0));
        let mut avg = MovingAverage::new(&tm, 2.0).unwrap();
        assert_eq!(avg.compute(3.0).unwrap(), 3.0); // t=0
        tm.advance(None).unwrap();
        assert_eq!(avg.compute(5.0).unwrap(), 4.0); // t=1
        tm.advance(None).unwrap();
        assert_eq!(avg.compute(7.0).unwrap(), 5.0); // t=2, sample at t=0 is on the edge
        tm.advance(None).unwrap();
        assert_eq!(avg.compute(9.0).unwrap(), 7.0); // t=3, t=0 evicted
        assert_eq!(avg.len(), 3);
    }

    #[test]
    fn long_gap_empties_old_samples() {
        let tm = Arc::new(TimeManager::default());
        let mut avg = MovingAverage::new(&tm, 1.0).unwrap();
        avg.compute(100.0).unwrap();
        tm.advance(Some(10.0)).unwrap();
        assert_eq!(avg.compute(1.0).unwrap(), 1.0);
        assert_eq!(avg.len(), 1);
    }

    #[test]
    fn state_round_trips_through_json() {
        let tm = Arc::new(TimeManager::simulation(1.0));
        let mut avg = MovingAverage::new(&tm, 5.0).unwrap();
        avg.compute(1.0).unwrap();
        tm.advance(None).unwrap();
        avg.compute(2.0).unwrap();

        let json = serde_json::to_value(avg.state()).unwrap();
        let mut other = MovingAverage::new(&tm, 5.0).unwrap();
        other.set_state(serde_json::from_value(json).unwrap());
        assert_eq!(other.state(), avg.state());
    }
}
