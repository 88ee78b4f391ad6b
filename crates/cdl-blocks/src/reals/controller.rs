//! PID controller with output limits and anti-windup.
//!
//! The control error is normalized by the typical error range `r`:
//! `e = sign * (u_s - u_m) / r` with `sign = +1` for reverse action (output
//! rises when the measurement falls below the setpoint) and `-1` for direct
//! action. The output is
//!
//! ```text
//! y = clamp(k * (e + integral / Ti + Td * de_f/dt), yMin, yMax)
//! ```
//!
//! where `de_f/dt` is the error derivative passed through a first-order
//! filter with time constant `Td / Nd`. While the output is clamped the
//! integral is pulled back by the clamped excess scaled with `1 / (k * Ni)`.

use cdl_core::{CdlError, CdlResult, ensure_positive};
use serde::{Deserialize, Serialize};

use crate::block::{Block, TimeSource};

/// Which terms the controller uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControllerType {
    P,
    #[default]
    PI,
    PD,
    PID,
}

impl ControllerType {
    pub fn has_integral(self) -> bool {
        matches!(self, ControllerType::PI | ControllerType::PID)
    }

    pub fn has_derivative(self) -> bool {
        matches!(self, ControllerType::PD | ControllerType::PID)
    }
}

/// PID configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidConfig {
    pub controller_type: ControllerType,
    /// Gain.
    pub k: f64,
    /// Integral time constant (seconds).
    pub ti: f64,
    /// Derivative time constant (seconds).
    pub td: f64,
    /// Typical range of the control error.
    pub r: f64,
    pub y_max: f64,
    pub y_min: f64,
    /// Anti-windup factor.
    pub ni: f64,
    /// Derivative filter factor.
    pub nd: f64,
    /// Initial integral state.
    pub xi_start: f64,
    /// Initial filtered derivative.
    pub yd_start: f64,
    pub reverse_acting: bool,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            controller_type: ControllerType::PI,
            k: 1.0,
            ti: 0.5,
            td: 0.1,
            r: 1.0,
            y_max: 1.0,
            y_min: 0.0,
            ni: 0.9,
            nd: 10.0,
            xi_start: 0.0,
            yd_start: 0.0,
            reverse_acting: true,
        }
    }
}

impl PidConfig {
    fn validate(&self) -> CdlResult<()> {
        const NAME: &str = Pid::NAME;
        // also rejects NaN limits
        if !(self.y_min < self.y_max) {
            return Err(CdlError::config(NAME, "yMin must be less than yMax"));
        }
        ensure_positive(self.k, NAME, "k must be > 0")?;
        ensure_positive(self.r, NAME, "r must be > 0")?;
        ensure_positive(self.ni, NAME, "Ni must be > 0")?;
        ensure_positive(self.nd, NAME, "Nd must be > 0")?;
        if self.controller_type.has_integral() {
            ensure_positive(self.ti, NAME, "Ti must be > 0")?;
        }
        if self.controller_type.has_derivative() {
            ensure_positive(self.td, NAME, "Td must be > 0")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PidInput {
    /// Setpoint.
    pub u_s: f64,
    /// Measurement.
    pub u_m: f64,
}

impl PidInput {
    pub fn new(u_s: f64, u_m: f64) -> Self {
        Self { u_s, u_m }
    }
}

/// PID controller state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidState {
    /// Integral of the normalized error (seconds).
    pub integral: f64,
    pub last_error: f64,
    pub derivative_filtered: f64,
    /// `None` until the first call.
    pub last_time: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Pid {
    config: PidConfig,
    time: TimeSource,
    state: PidState,
}

impl Pid {
    pub fn new(time: impl Into<TimeSource>, config: PidConfig) -> CdlResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            time: time.into(),
            state: Self::initial(&config),
        })
    }

    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    fn initial(config: &PidConfig) -> PidState {
        PidState {
            integral: config.xi_start,
            last_error: 0.0,
            derivative_filtered: config.yd_start,
            last_time: None,
        }
    }

    fn error(&self, input: PidInput) -> f64 {
        let sign = if self.config.reverse_acting { 1.0 } else { -1.0 };
        sign * (input.u_s - input.u_m) / self.config.r
    }

    fn clamp(&self, y: f64) -> f64 {
        y.clamp(self.config.y_min, self.config.y_max)
    }
}

impl Block for Pid {
    type Input = PidInput;
    type Output = f64;
    type State = PidState;

    const NAME: &'static str = "PID";

    fn compute(&mut self, input: PidInput) -> CdlResult<f64> {
        let now = self.time.now(Self::NAME)?;
        let error = self.error(input);
        let cfg = self.config;

        let Some(last_time) = self.state.last_time else {
            // no elapsed time yet: proportional action only
            self.state.last_time = Some(now);
            self.state.last_error = error;
            return Ok(self.clamp(cfg.k * error));
        };
        let dt = now - last_time;

        let p_term = cfg.k * error;

        let mut i_term = 0.0;
        if cfg.controller_type.has_integral() {
            if dt > 0.0 {
                self.state.integral += error * dt;
            }
            i_term = cfg.k / cfg.ti * self.state.integral;
        }

        let mut d_term = 0.0;
        if cfg.controller_type.has_derivative() {
            if dt > 0.0 {
                let raw = (error - self.state.last_error) / dt;
                let tau = cfg.td / cfg.nd;
                let alpha = dt / (tau + dt);
                self.state.derivative_filtered += alpha * (raw - self.state.derivative_filtered);
            }
            d_term = cfg.k * cfg.td * self.state.derivative_filtered;
        }

        let y_unlimited = p_term + i_term + d_term;
        let y = self.clamp(y_unlimited);

        if y != y_unlimited {
            tracing::trace!(block = Self::NAME, y_unlimited, y, "output saturated");
            if cfg.controller_type.has_integral() && dt > 0.0 {
                self.state.integral -= (y_unlimited - y) / (cfg.k * cfg.ni) * dt;
            }
        }

        self.state.last_error = error;
        self.state.last_time = Some(now);
        Ok(y)
    }

    fn reset_state(&mut self) {
        self.state = Self::initial(&self.config);
    }

    fn state(&self) -> PidState {
        self.state
    }

    fn set_state(&mut self, state: PidState) {
        self.state = state;
    }
}
