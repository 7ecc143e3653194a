//! Run configuration and validation.

use crate::error::{Error, Result};

/// Run configuration: block size, precode parameters, the BP escalation
/// threshold, and the PRNG seed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Symbols per source block; must be a positive multiple of 8.
    pub k: usize,
    /// Number of precode parity symbols (ignored unless `precode` is set).
    pub c: usize,
    /// Precode density in `(0,1)` (ignored unless `precode` is set).
    pub d: f64,
    /// BP escalation threshold; `None` means "never escalate".
    pub oh: Option<usize>,
    /// Whether to enable the LDPC precode and BP priming/escalation.
    pub precode: bool,
    /// Optional PRNG seed, for reproducible runs.
    pub seed: Option<u64>,
}

impl Config {
    /// A precode-disabled configuration for the given block size.
    pub fn unprecoded(k: usize) -> Self {
        Self {
            k,
            c: 0,
            d: 0.0,
            oh: None,
            precode: false,
            seed: None,
        }
    }

    /// A precode-enabled configuration.
    pub fn precoded(k: usize, c: usize, d: f64, oh: Option<usize>) -> Self {
        Self {
            k,
            c,
            d,
            oh,
            precode: true,
            seed: None,
        }
    }

    /// Set the PRNG seed (builder-style).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate every configuration invariant, returning the violated rule
    /// as a [`Error::Config`].
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 || self.k % 8 != 0 {
            return Err(Error::config(format!(
                "K must be a positive multiple of 8, got {}",
                self.k
            )));
        }
        if self.precode {
            if self.c == 0 {
                return Err(Error::config("c must be at least 1 when precode is enabled"));
            }
            if !(self.d > 0.0 && self.d < 1.0) {
                return Err(Error::config(format!(
                    "density must lie in (0,1), got {}",
                    self.d
                )));
            }
            if let Some(oh) = self.oh {
                if oh == 0 {
                    return Err(Error::config("oh must be positive when present"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_k_not_multiple_of_8() {
        assert!(Config::unprecoded(9).validate().is_err());
    }

    #[test]
    fn rejects_zero_k() {
        assert!(Config::unprecoded(0).validate().is_err());
    }

    #[test]
    fn accepts_unprecoded_default() {
        assert!(Config::unprecoded(16).validate().is_ok());
    }

    #[test]
    fn rejects_density_out_of_bounds_when_precoded() {
        assert!(Config::precoded(8, 3, 0.0, None).validate().is_err());
        assert!(Config::precoded(8, 3, 1.0, None).validate().is_err());
        assert!(Config::precoded(8, 3, 0.4, None).validate().is_ok());
    }

    #[test]
    fn rejects_zero_oh_when_present() {
        assert!(Config::precoded(8, 3, 0.4, Some(0)).validate().is_err());
        assert!(Config::precoded(8, 3, 0.4, Some(1)).validate().is_ok());
        assert!(Config::precoded(8, 3, 0.4, None).validate().is_ok());
    }

    #[test]
    fn rejects_zero_c_when_precoded() {
        assert!(Config::precoded(8, 0, 0.4, None).validate().is_err());
    }
}
