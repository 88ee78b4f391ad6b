//! Vector routing: extraction, replication and masking.
//!
//! Each block is generic over the element type; the `Real*`, `Integer*` and
//! `Boolean*` aliases name the three signal families. Indices are 1-based
//! and clamped to `[1, nin]`. Input vectors whose length differs from the
//! configured `nin` fail with [`CdlError::Domain`].

use cdl_core::{CdlError, CdlResult};

use crate::block::Block;

fn ensure_count(block: &'static str, n: usize, what: &'static str) -> CdlResult<usize> {
    if n == 0 {
        return Err(CdlError::config(block, what));
    }
    Ok(n)
}

fn ensure_len<T>(block: &'static str, u: &[T], nin: usize) -> CdlResult<()> {
    if u.len() != nin {
        return Err(CdlError::domain(
            block,
            "input length must equal nin",
            u.len() as f64,
        ));
    }
    Ok(())
}

/// 1-based `index` clamped to `[1, nin]`, as a 0-based position.
fn clamped_position(index: i64, nin: usize) -> usize {
    let nin = i64::try_from(nin).unwrap_or(i64::MAX);
    (index.clamp(1, nin) - 1) as usize
}

macro_rules! stateless_generic {
    ($name:ident, $block_name:literal, $input:ty => $output:ty, |$this:ident, $arg:pat_param| $body:expr) => {
        impl<T: Clone> Block for $name<T> {
            type Input = $input;
            type Output = $output;
            type State = ();

            const NAME: &'static str = $block_name;

            fn compute(&mut self, input: $input) -> CdlResult<$output> {
                let $this = &*self;
                let $arg = input;
                $body
            }

            fn reset_state(&mut self) {}

            fn state(&self) {}

            fn set_state(&mut self, _state: ()) {}
        }
    };
}

/// Element of `u` selected by the `index` input.
#[derive(Debug, Clone, PartialEq)]
pub struct Extractor<T> {
    nin: usize,
    _element: std::marker::PhantomData<T>,
}

impl<T: Clone> Extractor<T> {
    pub fn new(nin: usize) -> CdlResult<Self> {
        Ok(Self {
            nin: ensure_count(Self::NAME, nin, "nin must be >= 1")?,
            _element: std::marker::PhantomData,
        })
    }
}

/// Inputs of [`Extractor`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorInput<T> {
    pub u: Vec<T>,
    /// 1-based.
    pub index: i64,
}

impl<T> ExtractorInput<T> {
    pub fn new(u: Vec<T>, index: i64) -> Self {
        Self { u, index }
    }
}

stateless_generic!(Extractor, "Extractor", ExtractorInput<T> => T, |this, input| {
    ensure_len(Self::NAME, &input.u, this.nin)?;
    let mut u = input.u;
    Ok(u.swap_remove(clamped_position(input.index, this.nin)))
});

/// Element of `u` at the fixed 1-based position `extract`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractSignal<T> {
    nin: usize,
    position: usize,
    _element: std::marker::PhantomData<T>,
}

impl<T: Clone> ExtractSignal<T> {
    pub fn new(nin: usize, extract: i64) -> CdlResult<Self> {
        let nin = ensure_count(Self::NAME, nin, "nin must be >= 1")?;
        Ok(Self {
            nin,
            position: clamped_position(extract, nin),
            _element: std::marker::PhantomData,
        })
    }
}

stateless_generic!(ExtractSignal, "ExtractSignal", Vec<T> => T, |this, mut u| {
    ensure_len(Self::NAME, &u, this.nin)?;
    Ok(u.swap_remove(this.position))
});

/// `u` repeated `nout` times.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarReplicator<T> {
    nout: usize,
    _element: std::marker::PhantomData<T>,
}

impl<T: Clone> ScalarReplicator<T> {
    pub fn new(nout: usize) -> CdlResult<Self> {
        Ok(Self {
            nout: ensure_count(Self::NAME, nout, "nout must be >= 1")?,
            _element: std::marker::PhantomData,
        })
    }
}

stateless_generic!(ScalarReplicator, "ScalarReplicator", T => Vec<T>, |this, u| {
    Ok(vec![u; this.nout])
});

/// The whole vector `u` concatenated `nrep` times.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorReplicator<T> {
    nin: usize,
    nrep: usize,
    _element: std::marker::PhantomData<T>,
}

impl<T: Clone> VectorReplicator<T> {
    pub fn new(nin: usize, nrep: usize) -> CdlResult<Self> {
        Ok(Self {
            nin: ensure_count(Self::NAME, nin, "nin must be >= 1")?,
            nrep: ensure_count(Self::NAME, nrep, "nrep must be >= 1")?,
            _element: std::marker::PhantomData,
        })
    }

    pub fn nout(&self) -> usize {
        self.nin * self.nrep
    }
}

stateless_generic!(VectorReplicator, "VectorReplicator", Vec<T> => Vec<T>, |this, u| {
    ensure_len(Self::NAME, &u, this.nin)?;
    let mut y = Vec::with_capacity(this.nout());
    for _ in 0..this.nrep {
        y.extend_from_slice(&u);
    }
    Ok(y)
});

/// Elements of `u` where the mask is true, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorFilter<T> {
    msk: Vec<bool>,
    _element: std::marker::PhantomData<T>,
}

impl<T: Clone> VectorFilter<T> {
    /// `nout` must equal the number of true mask entries. The mask defaults
    /// to all true.
    pub fn new(nin: usize, nout: usize, msk: Option<Vec<bool>>) -> CdlResult<Self> {
        let nin = ensure_count(Self::NAME, nin, "nin must be >= 1")?;
        let msk = msk.unwrap_or_else(|| vec![true; nin]);
        if msk.len() != nin {
            return Err(CdlError::config(Self::NAME, "mask length must equal nin"));
        }
        if msk.iter().filter(|&&m| m).count() != nout {
            return Err(CdlError::config(
                Self::NAME,
                "nout must equal the number of true mask entries",
            ));
        }
        Ok(Self {
            msk,
            _element: std::marker::PhantomData,
        })
    }

    pub fn mask(&self) -> &[bool] {
        &self.msk
    }
}

stateless_generic!(VectorFilter, "VectorFilter", Vec<T> => Vec<T>, |this, u| {
    ensure_len(Self::NAME, &u, this.msk.len())?;
    Ok(u.into_iter()
        .zip(&this.msk)
        .filter_map(|(v, &keep)| keep.then_some(v))
        .collect())
});

pub type RealExtractor = Extractor<f64>;
pub type IntegerExtractor = Extractor<i64>;
pub type BooleanExtractor = Extractor<bool>;
pub type RealExtractSignal = ExtractSignal<f64>;
pub type IntegerExtractSignal = ExtractSignal<i64>;
pub type BooleanExtractSignal = ExtractSignal<bool>;
pub type RealScalarReplicator = ScalarReplicator<f64>;
pub type IntegerScalarReplicator = ScalarReplicator<i64>;
pub type BooleanScalarReplicator = ScalarReplicator<bool>;
pub type RealVectorReplicator = VectorReplicator<f64>;
pub type IntegerVectorReplicator = VectorReplicator<i64>;
pub type BooleanVectorReplicator = VectorReplicator<bool>;
pub type RealVectorFilter = VectorFilter<f64>;
pub type IntegerVectorFilter = VectorFilter<i64>;
pub type BooleanVectorFilter = VectorFilter<bool>;
