//! Shared GF(2) linear algebra.
//!
//! The constraint matrix generator needs a column-rank check, the Gaussian
//! decoder needs full row reduction and back substitution, and the BP
//! decoder's escalation path needs exactly the same row reduction applied to
//! a differently-built augmented system. All three share the matrix type and
//! routines here instead of each rolling their own elimination.
//!
//! Rows are packed bit vectors ([`FixedBitSet`]) so XOR between rows is
//! word-parallel rather than a per-bit loop, and duplicate-row detection
//! compares the packed words rather than doing a pairwise bit compare.

use std::collections::HashSet;

use fixedbitset::FixedBitSet;

use crate::error::Error;

/// XOR `src` into `dst` in place, word at a time. Both must have the same
/// bit length.
fn xor_into(dst: &mut FixedBitSet, src: &FixedBitSet) {
    for (d, s) in dst.as_mut_slice().iter_mut().zip(src.as_slice().iter()) {
        *d ^= *s;
    }
}

/// An augmented linear system `A x = b` over GF(2), where `A` is stored as
/// one packed row per equation.
#[derive(Clone)]
pub struct Gf2Matrix {
    ncols: usize,
    rows: Vec<FixedBitSet>,
    rhs: Vec<bool>,
    seen: HashSet<Vec<u32>>,
}

impl Gf2Matrix {
    /// Create an empty system over `ncols` unknowns.
    pub fn new(ncols: usize) -> Self {
        Self {
            ncols,
            rows: Vec::new(),
            rhs: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Number of unknowns (columns).
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of equations (rows) currently accumulated.
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    /// Append a row if it is not an exact duplicate (by packed bits) of a
    /// row already present. Returns whether the row was added.
    ///
    /// A non-zero check is not performed here: a non-empty `coeffs` set is
    /// the caller's responsibility (e.g. [`crate::encoder::EncodedSymbol`]'s
    /// invariant that `coefficients` is never empty).
    pub fn add_row(&mut self, coeffs: FixedBitSet, rhs: bool) -> bool {
        debug_assert_eq!(coeffs.len(), self.ncols);
        let key = coeffs.as_slice().to_vec();
        if !self.seen.insert(key) {
            return false;
        }
        self.rows.push(coeffs);
        self.rhs.push(rhs);
        true
    }

    /// Rank of the coefficient matrix alone (ignoring the RHS column).
    pub fn rank(&self) -> usize {
        let mut rows: Vec<FixedBitSet> = self.rows.clone();
        Self::eliminate(&mut rows, None, self.ncols)
    }

    /// Rank of the augmented matrix `[A | b]`.
    pub fn rank_augmented(&self) -> usize {
        let mut rows: Vec<FixedBitSet> = self.rows.clone();
        let mut rhs = self.rhs.clone();
        Self::eliminate(&mut rows, Some(&mut rhs), self.ncols)
    }

    /// True iff `rank(A) == rank([A | b]) == ncols`, i.e. the system has a
    /// unique solution.
    pub fn is_full_rank(&self) -> bool {
        if self.rows.len() < self.ncols {
            return false;
        }
        self.rank() == self.ncols && self.rank_augmented() == self.ncols
    }

    /// Row-reduce and back-substitute, returning the length-`ncols` solution
    /// vector, or `Error::Underdetermined` if a pivot column cannot be
    /// found.
    pub fn solve(&self) -> Result<Vec<bool>, Error> {
        let mut rows = self.rows.clone();
        let mut rhs = self.rhs.clone();
        let rank = Self::eliminate(&mut rows, Some(&mut rhs), self.ncols);
        if rank < self.ncols || rows.len() < self.ncols {
            return Err(Error::Underdetermined);
        }
        rows.truncate(self.ncols);
        rhs.truncate(self.ncols);

        // Back substitution: soln[i] = b[i] XOR sum_{j > i} A[i,j] * soln[j].
        let mut soln = vec![false; self.ncols];
        for i in (0..self.ncols).rev() {
            let mut acc = rhs[i];
            for j in (i + 1)..self.ncols {
                if rows[i].contains(j) && soln[j] {
                    acc ^= true;
                }
            }
            soln[i] = acc;
        }
        Ok(soln)
    }

    /// Forward-eliminate `rows` (optionally carrying `rhs` along) over the
    /// first `ncols` columns using partial pivoting. Returns the number of
    /// pivots found (the rank).
    fn eliminate(rows: &mut Vec<FixedBitSet>, mut rhs: Option<&mut Vec<bool>>, ncols: usize) -> usize {
        let nrows = rows.len();
        let mut pivot_row = 0;
        for col in 0..ncols {
            if pivot_row >= nrows {
                break;
            }
            let Some(found) = (pivot_row..nrows).find(|&r| rows[r].contains(col)) else {
                continue;
            };
            if found != pivot_row {
                rows.swap(found, pivot_row);
                if let Some(rhs) = rhs.as_deref_mut() {
                    rhs.swap(found, pivot_row);
                }
            }
            for r in (pivot_row + 1)..nrows {
                if rows[r].contains(col) {
                    let (head, tail) = rows.split_at_mut(r);
                    xor_into(&mut tail[0], &head[pivot_row]);
                    if let Some(rhs) = rhs.as_deref_mut() {
                        rhs[r] ^= rhs[pivot_row];
                    }
                }
            }
            pivot_row += 1;
        }
        pivot_row
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn row(ncols: usize, bits: &[usize]) -> FixedBitSet {
        let mut r = FixedBitSet::with_capacity(ncols);
        for &b in bits {
            r.insert(b);
        }
        r
    }

    #[test]
    fn identity_system_solves_to_rhs() {
        let mut m = Gf2Matrix::new(3);
        m.add_row(row(3, &[0]), true);
        m.add_row(row(3, &[1]), false);
        m.add_row(row(3, &[2]), true);
        assert!(m.is_full_rank());
        assert_eq!(m.solve().unwrap(), vec![true, false, true]);
    }

    #[test]
    fn duplicate_rows_are_dropped() {
        let mut m = Gf2Matrix::new(3);
        assert!(m.add_row(row(3, &[0, 1]), true));
        assert!(!m.add_row(row(3, &[0, 1]), true));
        assert_eq!(m.nrows(), 1);
    }

    #[test]
    fn underdetermined_system_rejects_solve() {
        let mut m = Gf2Matrix::new(3);
        m.add_row(row(3, &[0]), true);
        m.add_row(row(3, &[1]), false);
        assert!(!m.is_full_rank());
        assert!(matches!(m.solve(), Err(Error::Underdetermined)));
    }

    #[test]
    fn xor_combination_solves_correctly() {
        // x0 ^ x1 = 1, x1 ^ x2 = 0, x0 = 1  =>  x0=1, x1=0, x2=0
        let mut m = Gf2Matrix::new(3);
        m.add_row(row(3, &[0, 1]), true);
        m.add_row(row(3, &[1, 2]), false);
        m.add_row(row(3, &[0]), true);
        assert!(m.is_full_rank());
        assert_eq!(m.solve().unwrap(), vec![true, false, false]);
    }

    #[test]
    fn rank_monotonicity() {
        let mut m = Gf2Matrix::new(4);
        let mut last = m.rank();
        for bits in [vec![0], vec![1], vec![0, 1], vec![2], vec![3]] {
            m.add_row(row(4, &bits), false);
            let r = m.rank();
            assert!(r >= last);
            last = r;
        }
    }
}
