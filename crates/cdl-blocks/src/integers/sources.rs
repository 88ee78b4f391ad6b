//! Integer-valued signal sources.

use cdl_core::{CdlError, CdlResult, ensure_positive, floor_mod};

use crate::block::{Block, TimeSource, stateless_block};
use crate::logical::PulseShape;
use crate::table::Tabulated;

stateless_block!(
    /// Constant integer output.
    Constant { k: i64 },
    () => i64,
    |this, _u| Ok(this.k)
);

/// Integer pulse train: `offset + amplitude` while high, `offset` otherwise.
#[derive(Debug, Clone)]
pub struct Pulse {
    pub amplitude: i64,
    pub offset: i64,
    pub shape: PulseShape,
    time: TimeSource,
}

impl Pulse {
    pub fn new(
        time: impl Into<TimeSource>,
        amplitude: i64,
        width: f64,
        period: f64,
        shift: f64,
        offset: i64,
    ) -> CdlResult<Self> {
        Ok(Self {
            amplitude,
            offset,
            shape: PulseShape::new(Self::NAME, width, period, shift)?,
            time: time.into(),
        })
    }
}

impl Block for Pulse {
    type Input = ();
    type Output = i64;
    type State = ();

    const NAME: &'static str = "IntegerPulse";

    fn compute(&mut self, _input: ()) -> CdlResult<i64> {
        let now = self.time.now(Self::NAME)?;
        Ok(if self.shape.is_high(now) {
            self.offset + self.amplitude
        } else {
            self.offset
        })
    }

    fn reset_state(&mut self) {}

    fn state(&self) {}

    fn set_state(&mut self, _state: ()) {}
}

/// Stamp tolerance of the periodic integer and boolean tables.
const STAMP_TOL: f64 = 1e-6;

/// Piecewise-constant table repeated every `period` seconds.
///
/// Rows are `[t, y1, y2, ...]` with integral values. The first time stamp
/// must be zero and the last one must fall before `period`. Each row holds
/// until the next stamp is reached.
#[derive(Debug, Clone)]
pub struct TimeTable {
    table: Tabulated,
    values: Vec<Vec<i64>>,
    period: f64,
    time: TimeSource,
}

impl TimeTable {
    pub fn new(
        time: impl Into<TimeSource>,
        table: &[Vec<f64>],
        time_scale: f64,
        period: f64,
    ) -> CdlResult<Self> {
        Self::named(Self::NAME, time, table, time_scale, period)
    }

    /// Daily table with time in seconds.
    pub fn daily(time: impl Into<TimeSource>, table: &[Vec<f64>]) -> CdlResult<Self> {
        Self::new(time, table, 1.0, 86_400.0)
    }

    pub(crate) fn named(
        block: &'static str,
        time: impl Into<TimeSource>,
        table: &[Vec<f64>],
        time_scale: f64,
        period: f64,
    ) -> CdlResult<Self> {
        let period = ensure_positive(period, block, "period must be > 0")?;
        let table = Tabulated::parse(block, table, time_scale)?;
        if table.stamps.first().is_some_and(|t| t.abs() > STAMP_TOL) {
            return Err(CdlError::config(block, "first time stamp must be zero"));
        }
        if table.stamps.last().is_some_and(|&t| t >= period) {
            return Err(CdlError::config(block, "last time stamp must be smaller than period"));
        }
        let values = table
            .rows
            .iter()
            .map(|row| row.iter().map(|&v| to_integer(block, v)).collect())
            .collect::<CdlResult<Vec<Vec<i64>>>>()?;
        Ok(Self {
            table,
            values,
            period,
            time: time.into(),
        })
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub(crate) fn values_at(&self, block: &'static str) -> CdlResult<&[i64]> {
        let now = self.time.now(block)?;
        let t = floor_mod(now, self.period);
        let i = self.table.row_at_or_before(t + STAMP_TOL).unwrap_or(0);
        Ok(&self.values[i])
    }
}

fn to_integer(block: &'static str, v: f64) -> CdlResult<i64> {
    let rounded = v.round();
    if (v - rounded).abs() > STAMP_TOL || rounded.abs() >= i64::MAX as f64 {
        return Err(CdlError::config(block, "table values must be integers"));
    }
    Ok(rounded as i64)
}

impl Block for TimeTable {
    type Input = ();
    type Output = Vec<i64>;
    type State = ();

    const NAME: &'static str = "IntegerTimeTable";

    fn compute(&mut self, _input: ()) -> CdlResult<Vec<i64>> {
        Ok(self.values_at(Self::NAME)?.to_vec())
    }

    fn reset_state(&mut self) {}

    fn state(&self) {}

    fn set_state(&mut self, _state: ()) {}
}
