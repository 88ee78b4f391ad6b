//! Type conversions between boolean, integer and real signals.

use cdl_core::CdlError;

use crate::block::stateless_block;

stateless_block!(
    /// `real_true` when `u`, `real_false` otherwise.
    BooleanToReal { real_true: f64, real_false: f64 },
    bool => f64,
    |this, u| Ok(if u { this.real_true } else { this.real_false })
);

impl Default for BooleanToReal {
    fn default() -> Self {
        Self {
            real_true: 1.0,
            real_false: 0.0,
        }
    }
}

stateless_block!(
    /// `integer_true` when `u`, `integer_false` otherwise.
    BooleanToInteger { integer_true: i64, integer_false: i64 },
    bool => i64,
    |this, u| Ok(if u { this.integer_true } else { this.integer_false })
);

impl Default for BooleanToInteger {
    fn default() -> Self {
        Self {
            integer_true: 1,
            integer_false: 0,
        }
    }
}

stateless_block!(
    IntegerToReal {},
    i64 => f64,
    |_this, u| Ok(u as f64)
);

stateless_block!(
    /// Truncation toward zero. Values that do not fit an `i64` are rejected
    /// instead of saturating.
    RealToInteger {},
    f64 => i64,
    |_this, u| {
        let truncated = u.trunc();
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
        if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
            return Err(CdlError::domain(Self::NAME, "value out of integer range", u));
        }
        Ok(truncated as i64)
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;

    #[test]
    fn boolean_conversions_use_parameters() {
        let mut to_real = BooleanToReal {
            real_true: 5.0,
            real_false: -1.0,
        };
        assert_eq!(to_real.compute(true).unwrap(), 5.0);
        assert_eq!(to_real.compute(false).unwrap(), -1.0);

        let mut to_int = BooleanToInteger::default();
        assert_eq!(to_int.compute(true).unwrap(), 1);
        assert_eq!(to_int.compute(false).unwrap(), 0);
    }

    #[test]
    fn real_to_integer_truncates_toward_zero() {
        let mut conv = RealToInteger {};
        assert_eq!(conv.compute(2.9).unwrap(), 2);
        assert_eq!(conv.compute(-2.9).unwrap(), -2);
        assert_eq!(conv.compute(-0.4).unwrap(), 0);
    }

    #[test]
    fn real_to_integer_rejects_unrepresentable() {
        let mut conv = RealToInteger {};
        let err = conv.compute(f64::NAN).unwrap_err();
        assert!(matches!(err, CdlError::Domain { block: "RealToInteger", .. }));
        assert!(conv.compute(1e300).is_err());
        assert!(conv.compute(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn integer_to_real() {
        assert_eq!(IntegerToReal {}.compute(-7).unwrap(), -7.0);
    }
}
