//! Moist-air property blocks fed by dry-bulb temperature and relative humidity.
//!
//! Inputs cross the block boundary as SI quantities. Relative humidity is a
//! ratio in `[0, 1]` and is clamped per block before use.

use cdl_core::constants::p_atm;
use cdl_core::{
    CdlError, CdlResult, Pressure, Ratio, Temperature, ensure_finite, ensure_positive,
    from_celsius, to_celsius, to_kelvin, to_pascal, to_unitless, unitless,
};

use crate::block::stateless_block;

/// Specific enthalpy of moist air per kg of dry air, J/kg.
pub type SpecEnthalpy = f64;

/// Dry-bulb temperature and relative humidity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DryBulbInput {
    pub t_dry_bul: Temperature,
    pub phi: Ratio,
}

impl DryBulbInput {
    /// `phi` as a plain fraction.
    pub fn new(t_dry_bul: Temperature, phi: f64) -> Self {
        Self {
            t_dry_bul,
            phi: unitless(phi),
        }
    }

    fn celsius(&self) -> CdlResult<(f64, f64)> {
        let t_c = ensure_finite(to_celsius(self.t_dry_bul), "TDryBul")?;
        let phi = ensure_finite(to_unitless(self.phi), "phi")?;
        Ok((t_c, phi))
    }
}

// Magnus-Tetens coefficients over water.
const MAGNUS_A: f64 = 17.27;
const MAGNUS_B_C: f64 = 237.7;

// Antoine coefficients for water, mmHg and degC.
const ANTOINE_A: f64 = 8.07131;
const ANTOINE_B: f64 = 1730.63;
const ANTOINE_C: f64 = 233.426;
const PA_PER_MMHG: f64 = 133.322;

const CP_AIR: f64 = 1006.0;
const CP_VAPOR: f64 = 1860.0;
const H_FG_0C: f64 = 2_501_000.0;
/// Ratio of molar masses, water over dry air.
const MOLAR_RATIO: f64 = 0.622;

/// Saturation pressure of water vapor (Antoine), Pa.
pub fn saturation_pressure(t_c: f64) -> f64 {
    10f64.powf(ANTOINE_A - ANTOINE_B / (ANTOINE_C + t_c)) * PA_PER_MMHG
}

stateless_block!(
    /// Dew point temperature (Magnus-Tetens). `phi` is clamped to `[0.01, 0.99]`.
    DewPoint {},
    DryBulbInput => Temperature,
    |_this, input| {
        let (t_c, phi) = input.celsius()?;
        let phi = phi.clamp(0.01, 0.99);
        let gamma = MAGNUS_A * t_c / (MAGNUS_B_C + t_c) + phi.ln();
        Ok(from_celsius(MAGNUS_B_C * gamma / (MAGNUS_A - gamma)))
    }
);

/// Specific enthalpy of moist air relative to dry air at 0 degC.
///
/// `phi` is clamped to `[0, 1]`. Vapor pressure at or above the ambient
/// pressure has no humidity ratio and is reported as a domain error.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecificEnthalpy {
    pub p_atm: Pressure,
}

impl SpecificEnthalpy {
    pub fn new(p_atm: Pressure) -> CdlResult<Self> {
        ensure_positive(to_pascal(p_atm), "SpecificEnthalpy", "p_atm must be > 0")?;
        Ok(Self { p_atm })
    }
}

impl Default for SpecificEnthalpy {
    fn default() -> Self {
        Self { p_atm: p_atm() }
    }
}

impl crate::block::Block for SpecificEnthalpy {
    type Input = DryBulbInput;
    type Output = SpecEnthalpy;
    type State = ();

    const NAME: &'static str = "SpecificEnthalpy";

    fn compute(&mut self, input: DryBulbInput) -> CdlResult<SpecEnthalpy> {
        let (t_c, phi) = input.celsius()?;
        let p_vapor = phi.clamp(0.0, 1.0) * saturation_pressure(t_c);
        let p_atm = to_pascal(self.p_atm);
        if p_vapor >= p_atm {
            return Err(CdlError::domain(
                Self::NAME,
                "vapor pressure exceeds ambient pressure",
                p_vapor,
            ));
        }
        let w = MOLAR_RATIO * p_vapor / (p_atm - p_vapor);
        Ok(CP_AIR * t_c + w * (H_FG_0C + CP_VAPOR * t_c))
    }

    fn reset_state(&mut self) {}

    fn state(&self) {}

    fn set_state(&mut self, _state: ()) {}
}

/// Wet bulb temperature (Stull 2011), never above the dry bulb.
///
/// The fit does not depend on pressure; `p_atm` is carried for parity with
/// [`SpecificEnthalpy`]. `phi` is clamped to `[0.01, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct WetBulb {
    pub p_atm: Pressure,
}

impl WetBulb {
    pub fn new(p_atm: Pressure) -> CdlResult<Self> {
        ensure_positive(to_pascal(p_atm), "WetBulb", "p_atm must be > 0")?;
        Ok(Self { p_atm })
    }
}

impl Default for WetBulb {
    fn default() -> Self {
        Self { p_atm: p_atm() }
    }
}

impl crate::block::Block for WetBulb {
    type Input = DryBulbInput;
    type Output = Temperature;
    type State = ();

    const NAME: &'static str = "WetBulb";

    fn compute(&mut self, input: DryBulbInput) -> CdlResult<Temperature> {
        let (t_c, phi) = input.celsius()?;
        let rh = phi.clamp(0.01, 1.0) * 100.0;
        let t_wet_c = t_c * (0.151977 * (rh + 8.313659).sqrt()).atan() + (t_c + rh).atan()
            - (rh - 1.676331).atan()
            + 0.00391838 * rh.powf(1.5) * (0.023101 * rh).atan()
            - 4.686035;
        let t_wet = from_celsius(t_wet_c);
        if to_kelvin(t_wet) > to_kelvin(input.t_dry_bul) {
            Ok(input.t_dry_bul)
        } else {
            Ok(t_wet)
        }
    }

    fn reset_state(&mut self) {}

    fn state(&self) {}

    fn set_state(&mut self, _state: ()) {}
}
