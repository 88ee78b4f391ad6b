//! Fixed-step run loop and result recording.

use cdl_core::{TIME_EPS, TimeManager};

use crate::error::{SimError, SimResult};
use crate::model::ControlModel;

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Absolute time at which the run stops (seconds)
    pub t_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 1.0,
            t_end: 60.0,
            max_steps: 100_000,
            record_every: 1,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if self.t_end.is_nan() || self.t_end <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "t_end must be positive",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        Ok(())
    }
}

/// Recorded model outputs, sampled at evaluation time.
#[derive(Clone, Debug, PartialEq)]
pub struct SimRecord<Y> {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// Model outputs
    pub y: Vec<Y>,
}

impl<Y> SimRecord<Y> {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

/// Drive `model` from the current time of `time` up to `opts.t_end`.
pub fn run_sim<M: ControlModel>(
    model: &mut M,
    time: &TimeManager,
    opts: &SimOptions,
) -> SimResult<SimRecord<M::Output>> {
    run_sim_with_hook(model, time, opts, |_, _| Ok(()))
}

/// Like [`run_sim`], calling `after_step(step, model)` once time has been
/// advanced past each step. Used to hang checkpointing off the loop.
pub fn run_sim_with_hook<M, F>(
    model: &mut M,
    time: &TimeManager,
    opts: &SimOptions,
    mut after_step: F,
) -> SimResult<SimRecord<M::Output>>
where
    M: ControlModel,
    F: FnMut(usize, &mut M) -> SimResult<()>,
{
    opts.validate()?;

    let mut record = SimRecord {
        t: Vec::new(),
        y: Vec::new(),
    };
    let mut last: Option<(f64, M::Output)> = None;

    let mut step = 0;
    while time.get_time() < opts.t_end - TIME_EPS && step < opts.max_steps {
        let t = time.get_time();
        let y = model.step()?;

        if step % opts.record_every == 0 {
            record.t.push(t);
            record.y.push(y);
            last = None;
        } else {
            last = Some((t, y));
        }

        time.advance(Some(opts.dt))?;
        after_step(step, model)?;
        step += 1;
    }

    // Always record the final evaluation
    if let Some((t, y)) = last {
        record.t.push(t);
        record.y.push(y);
    }

    if step == opts.max_steps && time.get_time() < opts.t_end - TIME_EPS {
        tracing::debug!(step, t = time.get_time(), "run stopped at max_steps");
    }

    Ok(record)
}
