//! Injected randomness.
//!
//! Every sampling operation in this crate — constraint matrix generation,
//! LT degree draws, LT index draws — goes through the [`RandomSource`] trait
//! rather than consulting a process-global generator. This keeps whole runs
//! reproducible given a seed, and lets tests substitute a fixed sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of randomness for the coding pipeline.
///
/// Implementors need only provide a uniform integer in an inclusive range
/// and a without-replacement sample of distinct indices; everything else
/// (degree draws, coefficient draws) is built from those two primitives.
pub trait RandomSource {
    /// Draw a value uniformly from `[lo, hi]` (inclusive on both ends).
    fn uniform_range(&mut self, lo: usize, hi: usize) -> usize;

    /// Draw `amount` distinct values from `0..length`, in arbitrary order.
    ///
    /// # Panics
    /// Implementations may panic if `amount > length`; callers are
    /// responsible for that invariant.
    fn sample_distinct(&mut self, length: usize, amount: usize) -> Vec<usize>;
}

/// The default [`RandomSource`], backed by `rand`'s non-cryptographic
/// `StdRng`.
pub struct StdRngSource {
    rng: StdRng,
}

impl StdRngSource {
    /// Construct a source seeded deterministically, for reproducible runs.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Construct a source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for StdRngSource {
    fn uniform_range(&mut self, lo: usize, hi: usize) -> usize {
        self.rng.random_range(lo..=hi)
    }

    fn sample_distinct(&mut self, length: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, length, amount).into_vec()
    }
}

/// A mutable borrow of any `RandomSource` is itself one: lets call sites
/// (e.g. [`crate::session::Session`]) hand out a borrow of a long-lived RNG
/// to a short-lived [`crate::encoder::LtEncoder`] instead of moving it in.
impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform_range(&mut self, lo: usize, hi: usize) -> usize {
        (**self).uniform_range(lo, hi)
    }

    fn sample_distinct(&mut self, length: usize, amount: usize) -> Vec<usize> {
        (**self).sample_distinct(length, amount)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn seeded_source_is_reproducible() {
        let mut a = StdRngSource::from_seed(7);
        let mut b = StdRngSource::from_seed(7);
        for _ in 0..16 {
            assert_eq!(a.uniform_range(1, 100), b.uniform_range(1, 100));
            assert_eq!(a.sample_distinct(50, 5), b.sample_distinct(50, 5));
        }
    }

    #[test]
    fn sample_distinct_has_no_duplicates() {
        let mut r = StdRngSource::from_seed(1);
        let mut v = r.sample_distinct(64, 20);
        v.sort_unstable();
        v.dedup();
        assert_eq!(v.len(), 20);
    }
}
