//! LT-style encoder: emits degree-weighted XOR combinations of a symbol
//! vector (source bits, or precoded intermediate bits).

use crate::bitblock::BitBlock;
use crate::rng::RandomSource;

/// One encoded symbol: the XOR of the symbol-vector bits at `coefficients`.
///
/// Invariant: `coefficients` is non-empty, sorted ascending, and
/// duplicate-free; `val` equals the XOR of the symbol vector at those
/// indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedSymbol {
    /// The XOR value of the selected symbols.
    pub val: bool,
    /// Sorted, duplicate-free indices of the symbols combined into `val`.
    pub coefficients: Vec<usize>,
}

impl EncodedSymbol {
    /// Build a symbol from an unsorted, possibly-unsorted index set and a
    /// source of truth to compute `val` from.
    ///
    /// # Panics
    /// Panics (in debug builds, via `debug_assert`) if `coefficients` is
    /// empty or contains an out-of-range index; callers within this crate
    /// never construct an invalid symbol, so this is an internal invariant
    /// rather than a user-facing validation.
    pub fn new(mut coefficients: Vec<usize>, symbols: &BitBlock) -> Self {
        debug_assert!(!coefficients.is_empty());
        debug_assert!(coefficients.iter().all(|&i| i < symbols.len()));
        coefficients.sort_unstable();
        coefficients.dedup();
        let val = symbols.xor_at(coefficients.iter().copied());
        Self { val, coefficients }
    }

    /// Degree of this symbol: the number of symbols combined into it.
    pub fn degree(&self) -> usize {
        self.coefficients.len()
    }
}

/// Draws a degree for the next encoded symbol, given the symbol-vector
/// length `n`.
///
/// A seam for the degree distribution as a configurable collaborator: the
/// crate wires in only [`UniformDegree`] by default, but an alternative
/// (e.g. a robust soliton) could implement this trait without touching
/// [`LtEncoder`].
pub trait DegreeDistribution {
    /// Sample a degree in `[1, n]`.
    fn sample_degree<R: RandomSource + ?Sized>(&self, n: usize, rng: &mut R) -> usize;
}

/// The experimental, deliberately uniform degree distribution: draws
/// uniformly from `[1, n]`. Intentionally worse than a robust soliton; kept
/// as the baseline a precode's benefit is measured against.
#[derive(Default)]
pub struct UniformDegree;

impl DegreeDistribution for UniformDegree {
    fn sample_degree<R: RandomSource + ?Sized>(&self, n: usize, rng: &mut R) -> usize {
        rng.uniform_range(1, n)
    }
}

/// A fresh encoder is created per source block, over whichever symbol
/// vector is in play (the K source bits, or the K+c precoded intermediate
/// bits), and emits one [`EncodedSymbol`] per call to [`Self::generate`].
pub struct LtEncoder<R, D = UniformDegree> {
    symbols: BitBlock,
    rng: R,
    distribution: D,
}

impl<R: RandomSource> LtEncoder<R, UniformDegree> {
    /// Build an encoder over `symbols` using the default uniform degree
    /// distribution.
    pub fn new(symbols: BitBlock, rng: R) -> Self {
        Self {
            symbols,
            rng,
            distribution: UniformDegree,
        }
    }
}

impl<R: RandomSource, D: DegreeDistribution> LtEncoder<R, D> {
    /// Build an encoder with an explicit degree distribution collaborator.
    pub fn with_distribution(symbols: BitBlock, rng: R, distribution: D) -> Self {
        Self {
            symbols,
            rng,
            distribution,
        }
    }

    /// Emit the next encoded symbol: draw a degree from `[1, N]`, draw that
    /// many distinct indices from `[0, N)`, and XOR the selected bits.
    pub fn generate(&mut self) -> EncodedSymbol {
        let n = self.symbols.len();
        let degree = self.distribution.sample_degree(n, &mut self.rng);
        let indices = self.rng.sample_distinct(n, degree);
        log::trace!("emitting encoded symbol of degree {degree}");
        EncodedSymbol::new(indices, &self.symbols)
    }

    /// Length of the symbol vector this encoder operates over.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rng::StdRngSource;

    #[test]
    fn symbols_are_well_formed() {
        let block = BitBlock::from_bytes(&[0b1011_0100], 8);
        let mut enc = LtEncoder::new(block.clone(), StdRngSource::from_seed(3));
        for _ in 0..50 {
            let s = enc.generate();
            assert!(!s.coefficients.is_empty());
            let mut sorted = s.coefficients.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted, s.coefficients, "coefficients must be sorted+unique");
            assert_eq!(s.val, block.xor_at(s.coefficients.iter().copied()));
        }
    }

    #[test]
    fn reproducible_with_same_seed() {
        let block = BitBlock::from_bytes(&[0xAA], 8);
        let mut a = LtEncoder::new(block.clone(), StdRngSource::from_seed(99));
        let mut b = LtEncoder::new(block, StdRngSource::from_seed(99));
        for _ in 0..10 {
            assert_eq!(a.generate(), b.generate());
        }
    }
}
