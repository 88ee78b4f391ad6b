//! Calendar decomposition of the simulation clock.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use cdl_core::{CdlError, CdlResult};
use serde::{Deserialize, Serialize};

use crate::block::{Block, TimeSource};

/// Calendar instant that simulation time zero refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZeroTime {
    /// 1970-01-01 00:00:00.
    UnixTimeStamp,
    /// January 1st, 00:00:00 of the given year, 2010 to 2031.
    NewYear(i32),
}

impl Default for ZeroTime {
    fn default() -> Self {
        ZeroTime::NewYear(2016)
    }
}

impl ZeroTime {
    const YEARS: std::ops::RangeInclusive<i32> = 2010..=2031;

    fn reference(self) -> Option<NaiveDateTime> {
        let year = match self {
            ZeroTime::UnixTimeStamp => 1970,
            ZeroTime::NewYear(year) if Self::YEARS.contains(&year) => year,
            ZeroTime::NewYear(_) => return None,
        };
        NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)
    }
}

/// Outputs of [`CalendarTime`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarTimeOutput {
    pub year: i64,
    /// 1 to 12.
    pub month: i64,
    /// 1 to 31.
    pub day: i64,
    /// 0 to 23.
    pub hour: i64,
    /// Minute of the hour including the fraction from seconds.
    pub minute: f64,
    /// 1 = Monday, 7 = Sunday.
    pub week_day: i64,
}

/// Year, month, day, hour, minute and weekday of `time + offset` counted
/// from `zero_time`.
#[derive(Debug, Clone)]
pub struct CalendarTime {
    zero_time: ZeroTime,
    /// Seconds added to the clock, e.g. for a time zone.
    offset: f64,
    reference: NaiveDateTime,
    time: TimeSource,
}

impl CalendarTime {
    pub fn new(time: impl Into<TimeSource>, zero_time: ZeroTime, offset: f64) -> CdlResult<Self> {
        let reference = zero_time.reference().ok_or(CdlError::config(
            Self::NAME,
            "zero time year must be between 2010 and 2031",
        ))?;
        if !offset.is_finite() {
            return Err(CdlError::config(Self::NAME, "offset must be finite"));
        }
        Ok(Self {
            zero_time,
            offset,
            reference,
            time: time.into(),
        })
    }

    pub fn zero_time(&self) -> ZeroTime {
        self.zero_time
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    fn instant(&self, t: f64) -> CdlResult<NaiveDateTime> {
        let seconds = t + self.offset;
        let out_of_range = || CdlError::domain(Self::NAME, "time outside the calendar range", seconds);
        if !seconds.is_finite() {
            return Err(out_of_range());
        }
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9).round() as i64;
        let delta = TimeDelta::try_seconds(whole as i64).ok_or_else(out_of_range)?
            + TimeDelta::nanoseconds(nanos);
        self.reference
            .checked_add_signed(delta)
            .ok_or_else(out_of_range)
    }
}

impl Block for CalendarTime {
    type Input = ();
    type Output = CalendarTimeOutput;
    type State = ();

    const NAME: &'static str = "CalendarTime";

    fn compute(&mut self, _input: ()) -> CdlResult<CalendarTimeOutput> {
        let t = self.time.now(Self::NAME)?;
        let at = self.instant(t)?;
        Ok(CalendarTimeOutput {
            year: i64::from(at.year()),
            month: i64::from(at.month()),
            day: i64::from(at.day()),
            hour: i64::from(at.hour()),
            minute: f64::from(at.minute())
                + f64::from(at.second()) / 60.0
                + f64::from(at.nanosecond()) / 60e9,
            week_day: i64::from(at.weekday().number_from_monday()),
        })
    }

    fn reset_state(&mut self) {}

    fn state(&self) {}

    fn set_state(&mut self, _state: ()) {}
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cdl_core::{TimeManager, TimeStatePatch};

    use super::*;

    fn at(tm: &Arc<TimeManager>, t: f64) {
        tm.set_state(TimeStatePatch {
            current_time: Some(t),
            ..Default::default()
        });
    }

    #[test]
    fn new_year_2016_reference() {
        let tm = Arc::new(TimeManager::default());
        let mut cal = CalendarTime::new(&tm, ZeroTime::default(), 0.0).unwrap();

        let start = cal.compute(()).unwrap();
        assert_eq!((start.year, start.month, start.day, start.hour), (2016, 1, 1, 0));
        assert_eq!(start.minute, 0.0);
        // 2016-01-01 was a Friday
        assert_eq!(start.week_day, 5);

        // 2016 is a leap year: day 60 is February 29th
        at(&tm, 59.0 * 86400.0 + 13.0 * 3600.0 + 30.0 * 60.0 + 30.0);
        let leap = cal.compute(()).unwrap();
        assert_eq!((leap.month, leap.day, leap.hour), (2, 29, 13));
        assert!((leap.minute - 30.5).abs() < 1e-9);
        assert_eq!(leap.week_day, 1);
    }

    #[test]
    fn unix_reference_and_offset() {
        let tm = Arc::new(TimeManager::default());
        let mut cal = CalendarTime::new(&tm, ZeroTime::UnixTimeStamp, -3600.0).unwrap();
        // 2021-06-15 12:00:00 UTC, one hour earlier after the offset
        at(&tm, 1_623_758_400.0);
        let out = cal.compute(()).unwrap();
        assert_eq!(
            (out.year, out.month, out.day, out.hour),
            (2021, 6, 15, 11)
        );
        assert_eq!(out.week_day, 2);
    }

    #[test]
    fn validation_and_range() {
        let tm = Arc::new(TimeManager::default());
        let err = CalendarTime::new(&tm, ZeroTime::NewYear(2009), 0.0).unwrap_err();
        assert!(err.is_configuration());
        assert!(CalendarTime::new(&tm, ZeroTime::NewYear(2031), 0.0).is_ok());
        assert!(CalendarTime::new(&tm, ZeroTime::default(), f64::NAN).is_err());

        let mut cal = CalendarTime::new(&tm, ZeroTime::default(), 0.0).unwrap();
        at(&tm, 1e30);
        let err = cal.compute(()).unwrap_err();
        assert!(matches!(err, CdlError::Domain { block: "CalendarTime", .. }));

        let mut detached = CalendarTime::new(TimeSource::none(), ZeroTime::default(), 0.0).unwrap();
        assert!(matches!(
            detached.compute(()).unwrap_err(),
            CdlError::MissingTimeSource { .. }
        ));
    }
}
