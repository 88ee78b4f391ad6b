//! Combinational real-valued blocks.
//!
//! Out-of-domain inputs fail with [`CdlError::Domain`] instead of producing
//! NaN or infinity.

use cdl_core::{CdlError, CdlResult, floor_mod};

use crate::block::{Block, stateless_block};
use crate::logical::SwitchInput;

stateless_block!(Abs {}, f64 => f64, |_this, u| Ok(u.abs()));

stateless_block!(Add {}, (f64, f64) => f64, |_this, (u1, u2)| Ok(u1 + u2));

stateless_block!(Subtract {}, (f64, f64) => f64, |_this, (u1, u2)| Ok(u1 - u2));

stateless_block!(Multiply {}, (f64, f64) => f64, |_this, (u1, u2)| Ok(u1 * u2));

stateless_block!(
    Divide {},
    (f64, f64) => f64,
    |_this, (u1, u2)| {
        if u2 == 0.0 {
            return Err(CdlError::domain(Self::NAME, "division by zero", u2));
        }
        Ok(u1 / u2)
    }
);

stateless_block!(
    Sqrt {},
    f64 => f64,
    |_this, u| {
        if u < 0.0 {
            return Err(CdlError::domain(Self::NAME, "input must be non-negative", u));
        }
        Ok(u.sqrt())
    }
);

stateless_block!(Exp {}, f64 => f64, |_this, u| Ok(u.exp()));

stateless_block!(
    Log {},
    f64 => f64,
    |_this, u| {
        if u <= 0.0 {
            return Err(CdlError::domain(Self::NAME, "input must be positive", u));
        }
        Ok(u.ln())
    }
);

stateless_block!(
    Log10 {},
    f64 => f64,
    |_this, u| {
        if u <= 0.0 {
            return Err(CdlError::domain(Self::NAME, "input must be positive", u));
        }
        Ok(u.log10())
    }
);

stateless_block!(Sin {}, f64 => f64, |_this, u| Ok(u.sin()));

stateless_block!(Cos {}, f64 => f64, |_this, u| Ok(u.cos()));

stateless_block!(Tan {}, f64 => f64, |_this, u| Ok(u.tan()));

stateless_block!(
    Asin {},
    f64 => f64,
    |_this, u| {
        if !(-1.0..=1.0).contains(&u) {
            return Err(CdlError::domain(Self::NAME, "input must be in [-1, 1]", u));
        }
        Ok(u.asin())
    }
);

stateless_block!(
    Acos {},
    f64 => f64,
    |_this, u| {
        if !(-1.0..=1.0).contains(&u) {
            return Err(CdlError::domain(Self::NAME, "input must be in [-1, 1]", u));
        }
        Ok(u.acos())
    }
);

stateless_block!(Atan {}, f64 => f64, |_this, u| Ok(u.atan()));

stateless_block!(
    /// `atan2(u1, u2)`, i.e. the angle of the point `(u2, u1)`.
    Atan2 {},
    (f64, f64) => f64,
    |_this, (u1, u2)| Ok(u1.atan2(u2))
);

stateless_block!(
    /// Floored modulo; the result takes the sign of `u2`.
    Modulo {},
    (f64, f64) => f64,
    |_this, (u1, u2)| {
        if u2 == 0.0 {
            return Err(CdlError::domain(Self::NAME, "modulo by zero", u2));
        }
        Ok(floor_mod(u1, u2))
    }
);

stateless_block!(
    /// Round half away from zero to `n` decimal digits (`n` may be negative).
    Round { n: i32 },
    f64 => f64,
    |this, u| {
        let fac = 10f64.powi(this.n);
        let y = if u > 0.0 {
            (u * fac + 0.5).floor() / fac
        } else {
            (u * fac - 0.5).ceil() / fac
        };
        Ok(y)
    }
);

stateless_block!(Max {}, (f64, f64) => f64, |_this, (u1, u2)| Ok(u1.max(u2)));

stateless_block!(Min {}, (f64, f64) => f64, |_this, (u1, u2)| Ok(u1.min(u2)));

stateless_block!(Average {}, (f64, f64) => f64, |_this, (u1, u2)| Ok(0.5 * (u1 + u2)));

stateless_block!(AddParameter { p: f64 }, f64 => f64, |this, u| Ok(u + this.p));

stateless_block!(MultiplyByParameter { k: f64 }, f64 => f64, |this, u| Ok(this.k * u));

stateless_block!(
    /// Weighted sum `sum(k[i] * u[i])`. The input count must match the gains;
    /// an empty input vector gives `0`.
    MultiSum { k: Vec<f64> },
    Vec<f64> => f64,
    |this, u| {
        if u.is_empty() {
            return Ok(0.0);
        }
        if u.len() != this.k.len() {
            return Err(CdlError::domain(
                Self::NAME,
                "input count must match number of gains",
                u.len() as f64,
            ));
        }
        Ok(this.k.iter().zip(&u).map(|(k, u)| k * u).sum())
    }
);

stateless_block!(
    MultiMax {},
    Vec<f64> => f64,
    |_this, u| {
        u.iter()
            .copied()
            .reduce(f64::max)
            .ok_or(CdlError::domain(Self::NAME, "at least one input required", 0.0))
    }
);

stateless_block!(
    MultiMin {},
    Vec<f64> => f64,
    |_this, u| {
        u.iter()
            .copied()
            .reduce(f64::min)
            .ok_or(CdlError::domain(Self::NAME, "at least one input required", 0.0))
    }
);

/// Clamp to `[u_min, u_max]`.
///
/// Only built through [`Limiter::new`], so the bounds are always ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct Limiter {
    u_max: f64,
    u_min: f64,
}

impl Limiter {
    pub fn new(u_max: f64, u_min: f64) -> CdlResult<Self> {
        if !(u_min < u_max) {
            return Err(CdlError::config(Self::NAME, "uMin must be smaller than uMax"));
        }
        Ok(Self { u_max, u_min })
    }

    pub fn u_max(&self) -> f64 {
        self.u_max
    }

    pub fn u_min(&self) -> f64 {
        self.u_min
    }
}

impl Block for Limiter {
    type Input = f64;
    type Output = f64;
    type State = ();

    const NAME: &'static str = "Limiter";

    fn compute(&mut self, u: f64) -> CdlResult<f64> {
        Ok(u.clamp(self.u_min, self.u_max))
    }

    fn reset_state(&mut self) {}

    fn state(&self) {}

    fn set_state(&mut self, _state: ()) {}
}

/// Inputs of [`Line`]: two support points and the abscissa.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineInput {
    pub x1: f64,
    pub f1: f64,
    pub x2: f64,
    pub f2: f64,
    pub u: f64,
}

stateless_block!(
    /// Straight line through `(x1, f1)` and `(x2, f2)` evaluated at `u`.
    ///
    /// With `limit_below`/`limit_above` the abscissa is first clamped to `x1`
    /// and `x2` respectively. Coincident support points give `f1`.
    Line { limit_below: bool, limit_above: bool },
    LineInput => f64,
    |this, p| {
        let (a, b) = if p.x2 == p.x1 {
            (p.f1, 0.0)
        } else {
            let b = (p.f2 - p.f1) / (p.x2 - p.x1);
            (p.f2 - b * p.x2, b)
        };
        let mut x = p.u;
        if this.limit_below {
            x = x.max(p.x1);
        }
        if this.limit_above {
            x = x.min(p.x2);
        }
        Ok(a + b * x)
    }
);

impl Default for Line {
    fn default() -> Self {
        Self {
            limit_below: true,
            limit_above: true,
        }
    }
}

stateless_block!(
    Switch {},
    SwitchInput<f64> => f64,
    |_this, input| Ok(input.select())
);

#[cfg(test)]
mod tests {
    use super::*;

    fn domain_block(err: CdlError) -> &'static str {
        match err {
            CdlError::Domain { block, .. } => block,
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[test]
    fn basic_arithmetic() {
        assert_eq!(Add {}.compute((1.5, 2.0)).unwrap(), 3.5);
        assert_eq!(Subtract {}.compute((1.5, 2.0)).unwrap(), -0.5);
        assert_eq!(Multiply {}.compute((1.5, 2.0)).unwrap(), 3.0);
        assert_eq!(Divide {}.compute((3.0, 2.0)).unwrap(), 1.5);
        assert_eq!(Average {}.compute((1.0, 2.0)).unwrap(), 1.5);
        assert_eq!(AddParameter { p: 1.0 }.compute(2.0).unwrap(), 3.0);
        assert_eq!(MultiplyByParameter { k: -2.0 }.compute(2.0).unwrap(), -4.0);
        assert_eq!(Abs {}.compute(-2.0).unwrap(), 2.0);
    }

    #[test]
    fn domain_errors_propagate() {
        assert_eq!(domain_block(Divide {}.compute((1.0, 0.0)).unwrap_err()), "Divide");
        assert_eq!(domain_block(Sqrt {}.compute(-1.0).unwrap_err()), "Sqrt");
        assert_eq!(domain_block(Log {}.compute(0.0).unwrap_err()), "Log");
        assert_eq!(domain_block(Log10 {}.compute(-3.0).unwrap_err()), "Log10");
        assert_eq!(domain_block(Asin {}.compute(1.5).unwrap_err()), "Asin");
        assert_eq!(domain_block(Acos {}.compute(-1.5).unwrap_err()), "Acos");
        assert_eq!(domain_block(Modulo {}.compute((1.0, 0.0)).unwrap_err()), "Modulo");
        assert_eq!(domain_block(MultiMax {}.compute(vec![]).unwrap_err()), "MultiMax");
    }

    #[test]
    fn trig_and_exp() {
        assert!((Asin {}.compute(1.0).unwrap() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((Atan2 {}.compute((1.0, 0.0)).unwrap() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(Exp {}.compute(0.0).unwrap(), 1.0);
        assert!((Log10 {}.compute(1000.0).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn modulo_is_floored() {
        assert_eq!(Modulo {}.compute((-7.0, 3.0)).unwrap(), 2.0);
        assert_eq!(Modulo {}.compute((7.0, 3.0)).unwrap(), 1.0);
    }

    #[test]
    fn round_half_away_from_zero() {
        let mut r = Round { n: 1 };
        assert_eq!(r.compute(1.25).unwrap(), 1.3);
        assert_eq!(r.compute(-1.25).unwrap(), -1.3);
        let mut tens = Round { n: -1 };
        assert_eq!(tens.compute(15.0).unwrap(), 20.0);
    }

    #[test]
    fn multi_blocks() {
        let mut sum = MultiSum { k: vec![1.0, 2.0] };
        assert_eq!(sum.compute(vec![3.0, 4.0]).unwrap(), 11.0);
        assert_eq!(sum.compute(vec![]).unwrap(), 0.0);
        assert!(sum.compute(vec![1.0]).is_err());
        assert_eq!(MultiMax {}.compute(vec![1.0, 5.0, 3.0]).unwrap(), 5.0);
        assert_eq!(MultiMin {}.compute(vec![1.0, 5.0, -3.0]).unwrap(), -3.0);
    }

    #[test]
    fn limiter_validates_and_clamps() {
        assert!(Limiter::new(0.0, 1.0).unwrap_err().is_configuration());
        assert!(Limiter::new(f64::NAN, 0.0).unwrap_err().is_configuration());
        assert!(Limiter::new(1.0, f64::NAN).unwrap_err().is_configuration());
        assert!(Limiter::new(1.0, 1.0).is_err());
        let mut lim = Limiter::new(1.0, -1.0).unwrap();
        assert_eq!(lim.compute(3.0).unwrap(), 1.0);
        assert_eq!(lim.compute(-3.0).unwrap(), -1.0);
        assert_eq!(lim.compute(0.5).unwrap(), 0.5);
    }

    #[test]
    fn line_interpolates_and_limits() {
        let p = |u| LineInput {
            x1: 0.0,
            f1: 10.0,
            x2: 1.0,
            f2: 20.0,
            u,
        };
        let mut line = Line::default();
        assert_eq!(line.compute(p(0.5)).unwrap(), 15.0);
        assert_eq!(line.compute(p(2.0)).unwrap(), 20.0);
        assert_eq!(line.compute(p(-1.0)).unwrap(), 10.0);

        let mut free = Line {
            limit_below: false,
            limit_above: false,
        };
        assert_eq!(free.compute(p(2.0)).unwrap(), 30.0);

        let flat = LineInput {
            x1: 1.0,
            f1: 4.0,
            x2: 1.0,
            f2: 8.0,
            u: 3.0,
        };
        assert_eq!(free.compute(flat).unwrap(), 4.0);
    }

    #[test]
    fn switch_selects() {
        assert_eq!(Switch {}.compute(SwitchInput::new(1.0, true, 2.0)).unwrap(), 1.0);
    }
}
