//! Error types shared by every component of the coding pipeline.

/// The `Error` enum defines the possible errors that this crate can produce.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// ConfigError: a configuration option violates its documented contract
    /// (K not a multiple of 8, density out of `(0,1)`, `oh == 0`, ...).
    #[error("Invalid Configuration: {0}")]
    Config(String),
    /// DegenerateMatrix: the constraint matrix generator could not find a
    /// full column-rank matrix within its resample budget.
    #[error("Degenerate Density: no full-rank constraint matrix found after {attempts} attempts")]
    DegenerateMatrix {
        /// Number of resample attempts made before giving up.
        attempts: usize,
    },
    /// DecodeUnderdetermined: Gaussian elimination reached an all-zero pivot
    /// column before every column was eliminated, i.e. `decode()` was called
    /// before `is_full_rank()` returned true.
    #[error("Underdetermined: decoder has not yet reached full rank")]
    Underdetermined,
    /// DecodeFailed: the BP decoder reached its escalation threshold and the
    /// precode-augmented Gaussian system was still underdetermined.
    #[error("Decode Failed: escalation threshold reached without recovering all source bits")]
    DecodeFailed,
    /// InputError: the byte stream backing a `BlockSource` reported an I/O
    /// failure mid-block.
    #[error("Input Error: {0}")]
    Input(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
