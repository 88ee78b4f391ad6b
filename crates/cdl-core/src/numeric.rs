use crate::CdlError;

/// Floating point type used for every real-valued signal.
pub type Real = f64;

/// Tolerance used by the sample-instant checks of the trigger sources.
pub const TIME_EPS: Real = 1e-9;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CdlError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CdlError::NonFinite { what, value: v })
    }
}

/// Validate a strictly positive duration/period parameter.
pub fn ensure_positive(v: Real, block: &'static str, what: &'static str) -> Result<Real, CdlError> {
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CdlError::config(block, what))
    }
}

/// Validate a non-negative duration/hysteresis parameter.
pub fn ensure_non_negative(
    v: Real,
    block: &'static str,
    what: &'static str,
) -> Result<Real, CdlError> {
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(CdlError::config(block, what))
    }
}

/// Floored modulo: the result carries the sign of the divisor.
pub fn floor_mod(a: Real, b: Real) -> Real {
    a - b * (a / b).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn positive_and_non_negative_checks() {
        assert!(ensure_positive(0.1, "Sampler", "samplePeriod").is_ok());
        assert!(ensure_positive(0.0, "Sampler", "samplePeriod").is_err());
        assert!(ensure_non_negative(0.0, "Stage", "h").is_ok());
        assert!(ensure_non_negative(-1e-3, "Stage", "h").is_err());
    }

    #[test]
    fn floor_mod_follows_divisor_sign() {
        assert_eq!(floor_mod(7.0, 3.0), 1.0);
        assert_eq!(floor_mod(-7.0, 3.0), 2.0);
        assert_eq!(floor_mod(7.0, -3.0), -2.0);
    }
}
