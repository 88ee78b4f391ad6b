//! Small tank-filling model shared by the driver tests.

use std::sync::Arc;

use cdl_blocks::{Block, TimeSource};
use cdl_blocks::logical::Timer;
use cdl_blocks::reals::{Hysteresis, IntegratorInput, IntegratorWithReset};
use cdl_core::{CdlResult, TimeManager};
use cdl_sim::{BlockSnapshot, ControlModel, SimResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankOutput {
    pub level: f64,
    pub full: bool,
    pub full_for: f64,
}

/// Level integrates a constant inflow; a hysteresis flags "full" and a
/// timer measures how long it has been full.
pub struct TankModel {
    pub inflow: f64,
    level: IntegratorWithReset,
    full: Hysteresis,
    full_for: Timer,
}

impl TankModel {
    pub fn new(tm: &Arc<TimeManager>) -> Self {
        Self {
            inflow: 1.0,
            level: IntegratorWithReset::new(tm, 1.0, 0.0).unwrap(),
            full: Hysteresis::new(0.4, 0.6, false).unwrap(),
            full_for: Timer::new(tm, 0.2).unwrap(),
        }
    }

    /// Same wiring with no time manager attached.
    #[allow(dead_code)]
    pub fn detached() -> Self {
        Self {
            inflow: 1.0,
            level: IntegratorWithReset::new(TimeSource::none(), 1.0, 0.0).unwrap(),
            full: Hysteresis::new(0.4, 0.6, false).unwrap(),
            full_for: Timer::new(TimeSource::none(), 0.2).unwrap(),
        }
    }
}

impl ControlModel for TankModel {
    type Output = TankOutput;

    fn step(&mut self) -> CdlResult<TankOutput> {
        let level = self.level.compute(IntegratorInput::value(self.inflow))?;
        let full = self.full.compute(level)?;
        let full_for = self.full_for.compute(full)?.y;
        Ok(TankOutput {
            level,
            full,
            full_for,
        })
    }

    fn snapshot(&self) -> SimResult<BlockSnapshot> {
        let mut snap = BlockSnapshot::new();
        snap.insert("level", &self.level)?;
        snap.insert("full", &self.full)?;
        snap.insert("full_for", &self.full_for)?;
        Ok(snap)
    }

    fn restore(&mut self, snapshot: &BlockSnapshot) -> SimResult<()> {
        snapshot.restore("level", &mut self.level)?;
        snapshot.restore("full", &mut self.full)?;
        snapshot.restore("full_for", &mut self.full_for)?;
        Ok(())
    }
}

#[allow(dead_code)]
pub fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("cdl_sim_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
