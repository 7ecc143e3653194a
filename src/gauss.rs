//! Gaussian-elimination decoder: accumulates encoded symbols as rows of an
//! augmented GF(2) system and solves by row reduction and back
//! substitution once full rank is reached.

use fixedbitset::FixedBitSet;

use crate::encoder::EncodedSymbol;
use crate::error::{Error, Result};
use crate::gf2::Gf2Matrix;

/// Accumulates [`EncodedSymbol`]s and solves for the K-bit source block once
/// enough independent symbols have arrived.
pub struct GaussianDecoder {
    k: usize,
    matrix: Gf2Matrix,
}

impl GaussianDecoder {
    /// A fresh decoder for a K-bit source block.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            matrix: Gf2Matrix::new(k),
        }
    }

    /// Number of unknowns this decoder solves for.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of distinct rows accumulated so far.
    pub fn len(&self) -> usize {
        self.matrix.nrows()
    }

    /// Whether any rows have been accumulated.
    pub fn is_empty(&self) -> bool {
        self.matrix.nrows() == 0
    }

    /// Append `symbol` as a new row. Returns whether it was added (`false`
    /// if it exactly duplicated a row already present).
    ///
    /// Degree-zero symbols and out-of-range coefficients are rejected with
    /// [`Error::Config`].
    pub fn add(&mut self, symbol: &EncodedSymbol) -> Result<bool> {
        if symbol.coefficients.is_empty() {
            return Err(Error::config("encoded symbol has degree zero"));
        }
        if symbol.coefficients.iter().any(|&i| i >= self.k) {
            return Err(Error::config(format!(
                "coefficient out of range for K={}",
                self.k
            )));
        }
        let mut row = FixedBitSet::with_capacity(self.k);
        for &i in &symbol.coefficients {
            row.insert(i);
        }
        Ok(self.matrix.add_row(row, symbol.val))
    }

    /// True iff the accumulated system has a unique solution, i.e.
    /// `rank(A) == rank([A | b]) == K`.
    pub fn is_full_rank(&self) -> bool {
        self.matrix.is_full_rank()
    }

    /// Row-reduce and back-substitute to recover the K-bit source block.
    ///
    /// Returns [`Error::Underdetermined`] if called before
    /// [`Self::is_full_rank`] would return true.
    pub fn decode(&self) -> Result<Vec<bool>> {
        self.matrix.solve()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bitblock::BitBlock;
    use crate::encoder::LtEncoder;
    use crate::rng::StdRngSource;

    #[test]
    fn identity_roundtrip_k8() {
        let bits = [true, false, true, true, false, true, false, false];
        let mut block = BitBlock::zeroed(8);
        for (i, &b) in bits.iter().enumerate() {
            block.set(i, b);
        }

        let mut encoder = LtEncoder::new(block, StdRngSource::from_seed(11));
        let mut decoder = GaussianDecoder::new(8);
        let mut attempts = 0;
        while !decoder.is_full_rank() {
            decoder.add(&encoder.generate()).unwrap();
            attempts += 1;
            assert!(attempts < 10_000, "decoder failed to reach full rank");
        }
        assert_eq!(decoder.decode().unwrap(), bits);
    }

    #[test]
    fn idempotent_duplicate_add() {
        let block = BitBlock::from_bytes(&[0b1010_0101], 8);
        let symbol = EncodedSymbol::new(vec![0, 2, 4], &block);
        let mut decoder = GaussianDecoder::new(8);
        assert!(decoder.add(&symbol).unwrap());
        assert!(!decoder.add(&symbol).unwrap());
        assert_eq!(decoder.len(), 1);
    }

    #[test]
    fn order_independent_decoding() {
        let block = BitBlock::from_bytes(&[0b1100_1100], 8);
        let mut encoder = LtEncoder::new(block.clone(), StdRngSource::from_seed(21));
        let mut symbols = Vec::new();
        let mut probe = GaussianDecoder::new(8);
        while !probe.is_full_rank() {
            let s = encoder.generate();
            probe.add(&s).unwrap();
            symbols.push(s);
        }

        let forward: Vec<bool> = {
            let mut d = GaussianDecoder::new(8);
            for s in &symbols {
                d.add(s).unwrap();
            }
            d.decode().unwrap()
        };
        let reversed: Vec<bool> = {
            let mut d = GaussianDecoder::new(8);
            for s in symbols.iter().rev() {
                d.add(s).unwrap();
            }
            d.decode().unwrap()
        };
        assert_eq!(forward, reversed);
    }

    #[test]
    fn rejects_degree_zero_and_out_of_range() {
        let mut decoder = GaussianDecoder::new(4);
        let zero_degree = EncodedSymbol {
            val: false,
            coefficients: vec![],
        };
        assert!(matches!(decoder.add(&zero_degree), Err(Error::Config(_))));

        let out_of_range = EncodedSymbol {
            val: true,
            coefficients: vec![10],
        };
        assert!(matches!(decoder.add(&out_of_range), Err(Error::Config(_))));
    }
}
