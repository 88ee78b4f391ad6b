//! Real-valued signal sources driven by the clock.

use std::f64::consts::PI;

use cdl_core::{CdlError, CdlResult, ensure_finite, ensure_positive, floor_mod};
use serde::{Deserialize, Serialize};

use crate::block::{Block, TimeSource, stateless_block};
use crate::logical::PulseShape;
use crate::table::Tabulated;

stateless_block!(
    /// Constant real output.
    Constant { k: f64 },
    () => f64,
    |this, _u| Ok(this.k)
);

macro_rules! time_source_block {
    ($name:ident, $block_name:literal, |$this:ident, $t:ident| $body:expr) => {
        impl Block for $name {
            type Input = ();
            type Output = f64;
            type State = ();

            const NAME: &'static str = $block_name;

            fn compute(&mut self, _input: ()) -> CdlResult<f64> {
                let $t = self.time.now(Self::NAME)?;
                let $this = &*self;
                Ok($body)
            }

            fn reset_state(&mut self) {}

            fn state(&self) {}

            fn set_state(&mut self, _state: ()) {}
        }
    };
}

/// `offset` before `start_time`, then a linear rise by `height` over
/// `duration` seconds, then `offset + height`.
#[derive(Debug, Clone)]
pub struct Ramp {
    pub height: f64,
    pub duration: f64,
    pub offset: f64,
    pub start_time: f64,
    time: TimeSource,
}

impl Ramp {
    pub fn new(
        time: impl Into<TimeSource>,
        height: f64,
        duration: f64,
        offset: f64,
        start_time: f64,
    ) -> CdlResult<Self> {
        Ok(Self {
            height,
            duration: ensure_positive(duration, "Ramp", "duration must be > 0")?,
            offset,
            start_time,
            time: time.into(),
        })
    }
}

time_source_block!(Ramp, "Ramp", |this, t| {
    let elapsed = (t - this.start_time).clamp(0.0, this.duration);
    this.offset + this.height * elapsed / this.duration
});

/// `offset + amplitude * sin(2 pi freq_hz (t - start_time) + phase)` from
/// `start_time` on, `offset` before.
#[derive(Debug, Clone)]
pub struct Sin {
    pub amplitude: f64,
    pub freq_hz: f64,
    pub phase: f64,
    pub offset: f64,
    pub start_time: f64,
    time: TimeSource,
}

impl Sin {
    pub fn new(
        time: impl Into<TimeSource>,
        amplitude: f64,
        freq_hz: f64,
        phase: f64,
        offset: f64,
        start_time: f64,
    ) -> CdlResult<Self> {
        Ok(Self {
            amplitude,
            freq_hz: ensure_finite(freq_hz, "Sin freqHz")?,
            phase,
            offset,
            start_time,
            time: time.into(),
        })
    }
}

time_source_block!(Sin, "SinSource", |this, t| {
    if t < this.start_time {
        this.offset
    } else {
        this.offset
            + this.amplitude * (2.0 * PI * this.freq_hz * (t - this.start_time) + this.phase).sin()
    }
});

/// Real pulse train: `offset + amplitude` while high, `offset` otherwise.
#[derive(Debug, Clone)]
pub struct Pulse {
    pub amplitude: f64,
    pub offset: f64,
    pub shape: PulseShape,
    time: TimeSource,
}

impl Pulse {
    pub fn new(
        time: impl Into<TimeSource>,
        amplitude: f64,
        width: f64,
        period: f64,
        shift: f64,
        offset: f64,
    ) -> CdlResult<Self> {
        Ok(Self {
            amplitude,
            offset,
            shape: PulseShape::new("RealPulse", width, period, shift)?,
            time: time.into(),
        })
    }
}

time_source_block!(Pulse, "RealPulse", |this, t| {
    if this.shape.is_high(t) {
        this.offset + this.amplitude
    } else {
        this.offset
    }
});

/// Model time in seconds.
#[derive(Debug, Clone)]
pub struct CivilTime {
    time: TimeSource,
}

impl CivilTime {
    pub fn new(time: impl Into<TimeSource>) -> Self {
        Self { time: time.into() }
    }
}

time_source_block!(CivilTime, "CivilTime", |_this, t| t);

/// Interpolation between table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Smoothness {
    #[default]
    LinearSegments,
    /// Hold each row until the next time stamp.
    ConstantSegments,
}

/// Behaviour outside the tabulated time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Extrapolation {
    /// Repeat the table with period `t_last - t_first`.
    #[default]
    Periodic,
    HoldLastPoint,
    /// Extend the first or last segment linearly.
    LastTwoPoints,
}

/// Optional [`TimeTable`] parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeTableConfig {
    pub smoothness: Smoothness,
    pub extrapolation: Extrapolation,
    /// Added to each output column; zeros when `None`.
    pub offset: Option<Vec<f64>>,
    /// Seconds per unit of the time column, e.g. 3600 for hours.
    pub time_scale: f64,
}

impl Default for TimeTableConfig {
    fn default() -> Self {
        Self {
            smoothness: Smoothness::default(),
            extrapolation: Extrapolation::default(),
            offset: None,
            time_scale: 1.0,
        }
    }
}

/// Table lookup with respect to time.
///
/// Rows are `[t, y1, y2, ...]`; the output has one entry per value column.
/// Where time stamps repeat, the later row wins from that instant on.
#[derive(Debug, Clone)]
pub struct TimeTable {
    table: Tabulated,
    smoothness: Smoothness,
    extrapolation: Extrapolation,
    offset: Vec<f64>,
    time: TimeSource,
}

impl TimeTable {
    pub fn new(
        time: impl Into<TimeSource>,
        table: &[Vec<f64>],
        config: TimeTableConfig,
    ) -> CdlResult<Self> {
        let table = Tabulated::parse(Self::NAME, table, config.time_scale)?;
        let offset = match config.offset {
            None => vec![0.0; table.columns()],
            Some(offset) if offset.len() == table.columns() => offset,
            Some(_) => {
                return Err(CdlError::config(
                    Self::NAME,
                    "offset length must match the number of value columns",
                ));
            }
        };
        Ok(Self {
            table,
            smoothness: config.smoothness,
            extrapolation: config.extrapolation,
            offset,
            time: time.into(),
        })
    }

    pub fn smoothness(&self) -> Smoothness {
        self.smoothness
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    /// Tabulated values at `t`, before the offset.
    fn lookup(&self, t: f64) -> Vec<f64> {
        let stamps = &self.table.stamps;
        let rows = &self.table.rows;
        let last = stamps.len() - 1;
        let (t_first, t_last) = (stamps[0], stamps[last]);

        let mut t = t;
        if t < t_first || t > t_last {
            let end = if t < t_first { 0 } else { last };
            match self.extrapolation {
                Extrapolation::HoldLastPoint => return rows[end].clone(),
                Extrapolation::LastTwoPoints => {
                    let (i0, i1) = if end == 0 { (0, 1) } else { (last - 1, last) };
                    let dt = if last == 0 { 0.0 } else { stamps[i1] - stamps[i0] };
                    if dt <= 0.0 {
                        return rows[end].clone();
                    }
                    let frac = (t - stamps[end]) / dt;
                    return lerp(&rows[end], &rows[i0], &rows[i1], frac);
                }
                Extrapolation::Periodic => {
                    let range = t_last - t_first;
                    if range <= 0.0 {
                        return rows[end].clone();
                    }
                    t = t_first + floor_mod(t - t_first, range);
                }
            }
        }

        let i = self.table.row_at_or_before(t).unwrap_or(0);
        if self.smoothness == Smoothness::ConstantSegments || last == 0 {
            return rows[i].clone();
        }
        let i = i.min(last - 1);
        let dt = stamps[i + 1] - stamps[i];
        if dt <= 0.0 {
            return rows[i].clone();
        }
        lerp(&rows[i], &rows[i], &rows[i + 1], (t - stamps[i]) / dt)
    }
}

/// `base + frac * (v1 - v0)`, column-wise.
fn lerp(base: &[f64], v0: &[f64], v1: &[f64], frac: f64) -> Vec<f64> {
    base.iter()
        .zip(v0.iter().zip(v1))
        .map(|(b, (a0, a1))| b + frac * (a1 - a0))
        .collect()
}

impl Block for TimeTable {
    type Input = ();
    type Output = Vec<f64>;
    type State = ();

    const NAME: &'static str = "RealTimeTable";

    fn compute(&mut self, _input: ()) -> CdlResult<Vec<f64>> {
        let now = self.time.now(Self::NAME)?;
        let mut y = self.lookup(now);
        for (yi, off) in y.iter_mut().zip(&self.offset) {
            *yi += off;
        }
        Ok(y)
    }

    fn reset_state(&mut self) {}

    fn state(&self) {}

    fn set_state(&mut self, _state: ()) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdl_core::{CdlError, TimeManager, TimeStatePatch};
    use std::sync::Arc;

    #[test]
    fn ramp_shape() {
        let tm = Arc::new(TimeManager::default());
        let mut ramp = Ramp::new(&tm, 2.0, 4.0, 1.0, 1.0).unwrap();
        assert_eq!(ramp.compute(()).unwrap(), 1.0);
        tm.advance(Some(3.0)).unwrap();
        assert_eq!(ramp.compute(()).unwrap(), 2.0);
        tm.advance(Some(10.0)).unwrap();
        assert_eq!(ramp.compute(()).unwrap(), 3.0);
        assert!(Ramp::new(&tm, 1.0, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn sine_quarter_period() {
        let tm = Arc::new(TimeManager::default());
        let mut sin = Sin::new(&tm, 2.0, 1.0, 0.0, 1.0, 0.0).unwrap();
        assert!((sin.compute(()).unwrap() - 1.0).abs() < 1e-12);
        tm.advance(Some(0.25)).unwrap();
        assert!((sin.compute(()).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn pulse_levels() {
        let tm = Arc::new(TimeManager::simulation(0.5));
        let mut pulse = Pulse::new(&tm, 2.0, 0.5, 1.0, 0.0, -1.0).unwrap();
        assert_eq!(pulse.compute(()).unwrap(), 1.0);
        tm.advance(None).unwrap();
        assert_eq!(pulse.compute(()).unwrap(), -1.0);
    }

    #[test]
    fn sources_require_time() {
        let mut ramp = Ramp::new(TimeSource::none(), 1.0, 1.0, 0.0, 0.0).unwrap();
        assert_eq!(
            ramp.compute(()).unwrap_err(),
            CdlError::MissingTimeSource { block: "Ramp" }
        );
        assert_eq!(Constant { k: 3.5 }.compute(()).unwrap(), 3.5);
    }

    fn table_at(table: &mut TimeTable, tm: &TimeManager, t: f64) -> Vec<f64> {
        tm.set_state(TimeStatePatch {
            current_time: Some(t),
            ..TimeStatePatch::default()
        });
        table.compute(()).unwrap()
    }

    fn rows() -> Vec<Vec<f64>> {
        vec![vec![0.0, 0.0, 10.0], vec![1.0, 2.0, 10.0], vec![3.0, 6.0, 20.0]]
    }

    #[test]
    fn time_table_interpolates_linearly() {
        let tm = Arc::new(TimeManager::default());
        let mut table = TimeTable::new(&tm, &rows(), TimeTableConfig::default()).unwrap();
        assert_eq!(table_at(&mut table, &tm, 0.0), [0.0, 10.0]);
        assert_eq!(table_at(&mut table, &tm, 0.5), [1.0, 10.0]);
        assert_eq!(table_at(&mut table, &tm, 2.0), [4.0, 15.0]);
        assert_eq!(table_at(&mut table, &tm, 3.0), [6.0, 20.0]);
    }

    #[test]
    fn time_table_constant_segments_with_offset() {
        let tm = Arc::new(TimeManager::default());
        let config = TimeTableConfig {
            smoothness: Smoothness::ConstantSegments,
            offset: Some(vec![1.0, -10.0]),
            ..TimeTableConfig::default()
        };
        let mut table = TimeTable::new(&tm, &rows(), config).unwrap();
        assert_eq!(table_at(&mut table, &tm, 0.99), [1.0, 0.0]);
        assert_eq!(table_at(&mut table, &tm, 1.0), [3.0, 0.0]);
        assert_eq!(table_at(&mut table, &tm, 3.0), [7.0, 10.0]);
    }

    #[test]
    fn time_table_extrapolation_modes() {
        let tm = Arc::new(TimeManager::default());
        let make = |extrapolation| {
            let config = TimeTableConfig {
                extrapolation,
                ..TimeTableConfig::default()
            };
            TimeTable::new(&tm, &rows(), config).unwrap()
        };

        // period 3 s: t = 3.5 wraps to 0.5, t = -1 wraps to 2
        let mut periodic = make(Extrapolation::Periodic);
        assert_eq!(table_at(&mut periodic, &tm, 3.5), [1.0, 10.0]);
        assert_eq!(table_at(&mut periodic, &tm, -1.0), [4.0, 15.0]);

        let mut hold = make(Extrapolation::HoldLastPoint);
        assert_eq!(table_at(&mut hold, &tm, 10.0), [6.0, 20.0]);
        assert_eq!(table_at(&mut hold, &tm, -5.0), [0.0, 10.0]);

        let mut linear = make(Extrapolation::LastTwoPoints);
        assert_eq!(table_at(&mut linear, &tm, 5.0), [10.0, 30.0]);
        assert_eq!(table_at(&mut linear, &tm, -1.0), [-2.0, 10.0]);
    }

    #[test]
    fn time_table_scales_time_and_validates() {
        let tm = Arc::new(TimeManager::default());
        let hourly = TimeTableConfig {
            time_scale: 3600.0,
            ..TimeTableConfig::default()
        };
        let mut table = TimeTable::new(&tm, &[vec![0.0, 0.0], vec![1.0, 1.0]], hourly).unwrap();
        assert_eq!(table_at(&mut table, &tm, 1800.0), [0.5]);

        let bad_offset = TimeTableConfig {
            offset: Some(vec![1.0]),
            ..TimeTableConfig::default()
        };
        assert!(TimeTable::new(&tm, &rows(), bad_offset).unwrap_err().is_configuration());
        assert!(TimeTable::new(&tm, &[], TimeTableConfig::default()).is_err());
    }

    #[test]
    fn single_row_table_is_constant() {
        let tm = Arc::new(TimeManager::default());
        for extrapolation in [
            Extrapolation::Periodic,
            Extrapolation::HoldLastPoint,
            Extrapolation::LastTwoPoints,
        ] {
            let config = TimeTableConfig {
                extrapolation,
                ..TimeTableConfig::default()
            };
            let mut table = TimeTable::new(&tm, &[vec![2.0, 7.0]], config).unwrap();
            for t in [0.0, 2.0, 9.0] {
                assert_eq!(table_at(&mut table, &tm, t), [7.0]);
            }
        }
    }

    #[test]
    fn civil_time_is_model_time() {
        let tm = Arc::new(TimeManager::simulation(0.5));
        let mut civil = CivilTime::new(&tm);
        tm.advance(None).unwrap();
        assert_eq!(civil.compute(()).unwrap(), 0.5);
    }
}
