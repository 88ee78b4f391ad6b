//! Combinational integer blocks.
//!
//! Arithmetic is checked; an overflowing result is a domain error rather than
//! a wrap-around.

use cdl_core::CdlError;

use crate::block::stateless_block;
use crate::logical::SwitchInput;

fn overflow(block: &'static str, u: i64) -> CdlError {
    CdlError::domain(block, "integer overflow", u as f64)
}

stateless_block!(
    Abs {},
    i64 => i64,
    |_this, u| u.checked_abs().ok_or_else(|| overflow(Self::NAME, u))
);

stateless_block!(
    Add {},
    (i64, i64) => i64,
    |_this, (u1, u2)| u1.checked_add(u2).ok_or_else(|| overflow(Self::NAME, u1))
);

stateless_block!(
    Subtract {},
    (i64, i64) => i64,
    |_this, (u1, u2)| u1.checked_sub(u2).ok_or_else(|| overflow(Self::NAME, u1))
);

stateless_block!(
    Multiply {},
    (i64, i64) => i64,
    |_this, (u1, u2)| u1.checked_mul(u2).ok_or_else(|| overflow(Self::NAME, u1))
);

stateless_block!(
    Max {},
    (i64, i64) => i64,
    |_this, (u1, u2)| Ok(u1.max(u2))
);

stateless_block!(
    Min {},
    (i64, i64) => i64,
    |_this, (u1, u2)| Ok(u1.min(u2))
);

stateless_block!(
    Equal {},
    (i64, i64) => bool,
    |_this, (u1, u2)| Ok(u1 == u2)
);

stateless_block!(
    Less {},
    (i64, i64) => bool,
    |_this, (u1, u2)| Ok(u1 < u2)
);

stateless_block!(
    GreaterEqual {},
    (i64, i64) => bool,
    |_this, (u1, u2)| Ok(u1 >= u2)
);

stateless_block!(
    /// `y = u + p`.
    AddParameter { p: i64 },
    i64 => i64,
    |this, u| u.checked_add(this.p).ok_or_else(|| overflow(Self::NAME, u))
);

stateless_block!(
    /// Weighted sum `sum(k[i] * u[i])` over the shorter of the two vectors.
    MultiSum { k: Vec<i64> },
    Vec<i64> => i64,
    |this, u| {
        this.k.iter().zip(&u).try_fold(0_i64, |acc, (&k, &ui)| {
            k.checked_mul(ui)
                .and_then(|term| acc.checked_add(term))
                .ok_or_else(|| overflow(Self::NAME, ui))
        })
    }
);

stateless_block!(
    LessThreshold { t: i64 },
    i64 => bool,
    |this, u| Ok(u < this.t)
);

stateless_block!(
    GreaterEqualThreshold { t: i64 },
    i64 => bool,
    |this, u| Ok(u >= this.t)
);

stateless_block!(
    Switch {},
    SwitchInput<i64> => i64,
    |_this, input| Ok(input.select())
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;

    #[test]
    fn arithmetic() {
        assert_eq!(Abs {}.compute(-4).unwrap(), 4);
        assert_eq!(Add {}.compute((2, 3)).unwrap(), 5);
        assert_eq!(Subtract {}.compute((2, 3)).unwrap(), -1);
        assert_eq!(Multiply {}.compute((-2, 3)).unwrap(), -6);
        assert_eq!(AddParameter { p: 10 }.compute(-3).unwrap(), 7);
        assert_eq!(Max {}.compute((2, 3)).unwrap(), 3);
        assert_eq!(Min {}.compute((2, 3)).unwrap(), 2);
    }

    #[test]
    fn overflow_is_a_domain_error() {
        let err = Add {}.compute((i64::MAX, 1)).unwrap_err();
        assert!(matches!(err, CdlError::Domain { block: "Add", .. }));
        assert!(Abs {}.compute(i64::MIN).is_err());
    }

    #[test]
    fn comparisons() {
        assert!(Equal {}.compute((3, 3)).unwrap());
        assert!(Less {}.compute((2, 3)).unwrap());
        assert!(GreaterEqual {}.compute((3, 3)).unwrap());
        assert!(LessThreshold { t: 0 }.compute(-1).unwrap());
        assert!(!GreaterEqualThreshold { t: 2 }.compute(1).unwrap());
    }

    #[test]
    fn multi_sum_weights_inputs() {
        let mut sum = MultiSum { k: vec![1, -2, 3] };
        assert_eq!(sum.compute(vec![4, 5, 6]).unwrap(), 12);
        assert_eq!(sum.compute(vec![]).unwrap(), 0);
    }

    #[test]
    fn switch_selects() {
        assert_eq!(Switch {}.compute(SwitchInput::new(1, false, 2)).unwrap(), 2);
    }
}
