//! Time-dependent blocks refuse to run without a TimeManager.

use cdl_blocks::discrete::{FirstOrderHold, Sampler, ZeroOrderHold};
use cdl_blocks::integers::{Stage, StageConfig};
use cdl_blocks::logical::{
    Proof, ProofInput, SampleTrigger, Timer, TimerAccumulating, TimerAccumulatingInput, TrueDelay,
    TrueFalseHold, VariablePulse,
};
use cdl_blocks::reals::{
    Derivative, IntegratorInput, IntegratorWithReset, LimitSlewRate, MovingAverage, Pid,
    PidConfig, PidInput, Ramp,
};
use cdl_blocks::{Block, TimeSource, integers, logical, reals};
use cdl_core::{CdlError, CdlResult};

fn missing<T: std::fmt::Debug>(result: CdlResult<T>, block: &'static str) {
    assert_eq!(result.unwrap_err(), CdlError::MissingTimeSource { block });
}

#[test]
fn logical_blocks_need_time() {
    let none = TimeSource::none;
    missing(Timer::new(none(), 1.0).unwrap().compute(true), "Timer");
    missing(
        TimerAccumulating::new(none(), 1.0)
            .unwrap()
            .compute(TimerAccumulatingInput::new(true, false)),
        "TimerAccumulating",
    );
    missing(TrueDelay::new(none(), 1.0).unwrap().compute(true), "TrueDelay");
    missing(
        TrueFalseHold::symmetric(none(), 1.0).unwrap().compute(true),
        "TrueFalseHold",
    );
    missing(VariablePulse::new(none(), 1.0).unwrap().compute(0.5), "VariablePulse");
    missing(
        Proof::with_defaults(none())
            .unwrap()
            .compute(ProofInput::new(true, true)),
        "Proof",
    );
    missing(SampleTrigger::new(none(), 1.0, 0.0).unwrap().compute(()), "SampleTrigger");
}

#[test]
fn discrete_blocks_need_time() {
    let none = TimeSource::none;
    missing(Sampler::new(none(), 1.0, 0.0).unwrap().compute(1.0), "Sampler");
    missing(ZeroOrderHold::new(none(), 1.0, 0.0).unwrap().compute(1.0), "ZeroOrderHold");
    missing(FirstOrderHold::new(none(), 1.0, 0.0).unwrap().compute(1.0), "FirstOrderHold");
}

#[test]
fn continuous_blocks_need_time() {
    let none = TimeSource::none;
    missing(
        IntegratorWithReset::new(none(), 1.0, 0.0)
            .unwrap()
            .compute(IntegratorInput::value(1.0)),
        "IntegratorWithReset",
    );
    missing(Derivative::unlimited(none()).unwrap().compute(1.0), "Derivative");
    missing(LimitSlewRate::symmetric(none(), 1.0).unwrap().compute(1.0), "LimitSlewRate");
    missing(MovingAverage::new(none(), 10.0).unwrap().compute(1.0), "MovingAverage");
    missing(
        Pid::new(none(), PidConfig::default())
            .unwrap()
            .compute(PidInput::new(1.0, 0.0)),
        "PID",
    );
    missing(Ramp::new(none(), 1.0, 1.0, 0.0, 0.0).unwrap().compute(()), "Ramp");
    missing(
        Stage::new(none(), StageConfig::default()).unwrap().compute(0.5),
        "Stage",
    );
}

#[test]
fn calendar_sources_need_time() {
    let none = TimeSource::none;
    let table = [vec![0.0, 1.0], vec![3600.0, 0.0]];
    missing(
        reals::TimeTable::new(none(), &table, reals::TimeTableConfig::default())
            .unwrap()
            .compute(()),
        "RealTimeTable",
    );
    missing(
        integers::TimeTable::daily(none(), &table).unwrap().compute(()),
        "IntegerTimeTable",
    );
    missing(
        logical::TimeTable::daily(none(), &table).unwrap().compute(()),
        "TimeTable",
    );
    missing(reals::CivilTime::new(none()).compute(()), "CivilTime");
    missing(
        reals::CalendarTime::new(none(), reals::ZeroTime::default(), 0.0)
            .unwrap()
            .compute(()),
        "CalendarTime",
    );
}
