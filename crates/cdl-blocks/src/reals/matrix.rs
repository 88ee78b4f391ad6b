//! Vector and matrix blocks: sorting, gain matrices and row/column extrema.
//!
//! Matrices are row-major `Vec<Vec<f64>>` and must be rectangular.

use cdl_core::{CdlError, CdlResult};

use crate::block::{Block, stateless_block};

/// Outputs of [`Sort`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SortOutput {
    pub y: Vec<f64>,
    /// 1-based positions of the sorted values in the input.
    pub y_idx: Vec<i64>,
}

stateless_block!(
    /// Sort ascending or descending; equal values keep their input order.
    Sort { ascending: bool },
    Vec<f64> => SortOutput,
    |this, u| {
        let mut order: Vec<usize> = (0..u.len()).collect();
        if this.ascending {
            order.sort_by(|&a, &b| u[a].total_cmp(&u[b]));
        } else {
            order.sort_by(|&a, &b| u[b].total_cmp(&u[a]));
        }
        Ok(SortOutput {
            y: order.iter().map(|&i| u[i]).collect(),
            y_idx: order.iter().map(|&i| i as i64 + 1).collect(),
        })
    }
);

impl Default for Sort {
    fn default() -> Self {
        Self { ascending: true }
    }
}

/// Number of columns of a rectangular, non-empty matrix.
fn columns(m: &[Vec<f64>]) -> Option<usize> {
    let width = m.first()?.len();
    (width > 0 && m.iter().all(|row| row.len() == width)).then_some(width)
}

/// `y = K u`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixGain {
    k: Vec<Vec<f64>>,
    ncols: usize,
}

impl MatrixGain {
    pub fn new(k: Vec<Vec<f64>>) -> CdlResult<Self> {
        let ncols = columns(&k)
            .ok_or(CdlError::config(Self::NAME, "K must be a non-empty rectangular matrix"))?;
        Ok(Self { k, ncols })
    }

    pub fn gain(&self) -> &[Vec<f64>] {
        &self.k
    }
}

impl Default for MatrixGain {
    /// 2 x 2 identity.
    fn default() -> Self {
        Self {
            k: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            ncols: 2,
        }
    }
}

impl Block for MatrixGain {
    type Input = Vec<f64>;
    type Output = Vec<f64>;
    type State = ();

    const NAME: &'static str = "MatrixGain";

    fn compute(&mut self, u: Vec<f64>) -> CdlResult<Vec<f64>> {
        if u.len() != self.ncols {
            return Err(CdlError::domain(
                Self::NAME,
                "input length must equal the columns of K",
                u.len() as f64,
            ));
        }
        Ok(self
            .k
            .iter()
            .map(|row| row.iter().zip(&u).map(|(k, u)| k * u).sum())
            .collect())
    }

    fn reset_state(&mut self) {}

    fn state(&self) {}

    fn set_state(&mut self, _state: ()) {}
}

/// Fold each row (`row_wise`) or each column of `u` with `f`.
///
/// The NaN seed drops out because `f64::max` and `f64::min` ignore NaN.
fn extrema(
    block: &'static str,
    u: &[Vec<f64>],
    row_wise: bool,
    f: fn(f64, f64) -> f64,
) -> CdlResult<Vec<f64>> {
    let ncols = columns(u).ok_or(CdlError::domain(
        block,
        "input must be a non-empty rectangular matrix",
        u.len() as f64,
    ))?;
    Ok(if row_wise {
        u.iter()
            .map(|row| row.iter().copied().fold(f64::NAN, f))
            .collect()
    } else {
        (0..ncols)
            .map(|j| u.iter().map(|row| row[j]).fold(f64::NAN, f))
            .collect()
    })
}

stateless_block!(
    /// Largest entry of each row (`row_max`) or of each column.
    MatrixMax { row_max: bool },
    Vec<Vec<f64>> => Vec<f64>,
    |this, u| extrema(Self::NAME, &u, this.row_max, f64::max)
);

stateless_block!(
    /// Smallest entry of each row (`row_min`) or of each column.
    MatrixMin { row_min: bool },
    Vec<Vec<f64>> => Vec<f64>,
    |this, u| extrema(Self::NAME, &u, this.row_min, f64::min)
);

impl Default for MatrixMax {
    fn default() -> Self {
        Self { row_max: true }
    }
}

impl Default for MatrixMin {
    fn default() -> Self {
        Self { row_min: true }
    }
}
