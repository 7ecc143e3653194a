//! Constraint matrix generator for the LDPC precode.

use fixedbitset::FixedBitSet;

use crate::error::{Error, Result};
use crate::gf2::Gf2Matrix;
use crate::rng::RandomSource;

/// Default cap on resample attempts before giving up with
/// [`Error::DegenerateMatrix`].
pub const DEFAULT_RESAMPLE_CAP: usize = 64;

/// A K×c binary constraint matrix of full column rank, used by the LDPC
/// precoder to derive `c` parity bits and by the BP decoder to prime its
/// peeler with the corresponding constraint symbols.
pub struct ConstraintMatrix {
    k: usize,
    c: usize,
    /// One row per source bit; `rows[j]` has bit `i` set iff `G[j,i] == 1`.
    rows: Vec<FixedBitSet>,
}

impl ConstraintMatrix {
    /// Generate a K×c matrix with density `d` (fraction of cells set),
    /// resampling until it reaches full column rank `c`, up to
    /// `max_resamples` attempts.
    pub fn generate(
        k: usize,
        c: usize,
        density: f64,
        rng: &mut impl RandomSource,
        max_resamples: usize,
    ) -> Result<Self> {
        if c == 0 {
            return Err(Error::config("c must be at least 1 when precoding"));
        }
        if !(density > 0.0 && density < 1.0) {
            return Err(Error::config(format!(
                "density must lie in (0,1), got {density}"
            )));
        }

        let cells = k * c;
        let num_ones = ((cells as f64) * density).floor() as usize;

        for attempt in 1..=max_resamples {
            let positions = rng.sample_distinct(cells, num_ones);
            let mut rows = vec![FixedBitSet::with_capacity(c); k];
            for pos in positions {
                rows[pos / c].insert(pos % c);
            }

            let mut rank_check = Gf2Matrix::new(c);
            for row in &rows {
                rank_check.add_row(row.clone(), false);
            }
            if rank_check.rank() == c {
                log::debug!("constraint matrix reached full rank after {attempt} attempt(s)");
                return Ok(Self { k, c, rows });
            }
        }

        Err(Error::DegenerateMatrix {
            attempts: max_resamples,
        })
    }

    /// Number of source rows (K).
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of constraint columns (c).
    pub fn c(&self) -> usize {
        self.c
    }

    /// The set of source-row indices with a 1 in column `i`.
    pub fn column_ones(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(move |(_, row)| row.contains(i))
            .map(|(j, _)| j)
    }

    /// The bit row for source index `j` (bit `i` set iff `G[j,i] == 1`).
    pub fn row(&self, j: usize) -> &FixedBitSet {
        &self.rows[j]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rng::StdRngSource;

    #[test]
    fn generated_matrix_has_requested_shape_and_full_rank() {
        let mut rng = StdRngSource::from_seed(42);
        let g = ConstraintMatrix::generate(8, 3, 0.4, &mut rng, DEFAULT_RESAMPLE_CAP).unwrap();
        assert_eq!(g.k(), 8);
        assert_eq!(g.c(), 3);

        let mut check = Gf2Matrix::new(3);
        for j in 0..8 {
            check.add_row(g.row(j).clone(), false);
        }
        assert_eq!(check.rank(), 3);
    }

    #[test]
    fn rejects_density_out_of_range() {
        let mut rng = StdRngSource::from_seed(1);
        assert!(matches!(
            ConstraintMatrix::generate(8, 3, 0.0, &mut rng, 8),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ConstraintMatrix::generate(8, 3, 1.0, &mut rng, 8),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn rejects_zero_columns() {
        let mut rng = StdRngSource::from_seed(1);
        assert!(matches!(
            ConstraintMatrix::generate(8, 0, 0.4, &mut rng, 8),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn gives_up_after_resample_cap() {
        // c larger than k makes full column rank c unreachable; every
        // resample should fail and the cap should be respected.
        let mut rng = StdRngSource::from_seed(1);
        let result = ConstraintMatrix::generate(2, 5, 0.3, &mut rng, 4);
        assert!(matches!(
            result,
            Err(Error::DegenerateMatrix { attempts: 4 })
        ));
    }
}
