//! `erasure-fountain` is a fountain-style (LT / Raptor-like) rateless
//! erasure-coding harness over GF(2), built for studying the tradeoffs
//! between pure belief-propagation peeling and Gaussian-elimination
//! fallback rather than for production use.
//!
//! A run is one of two shapes:
//!
//! - **Unprecoded**: K source bits go straight into an [`encoder::LtEncoder`],
//!   and a [`gauss::GaussianDecoder`] accumulates encoded symbols until the
//!   system reaches full rank and can be solved directly.
//! - **LDPC-precoded**: K source bits are extended with `c` parity bits by
//!   [`precode::precode`] against a shared [`matrix::ConstraintMatrix`], and
//!   a [`bp::BpDecoder`] peels the K+c intermediate bits, escalating to a
//!   fresh Gaussian system (still over the same [`gf2::Gf2Matrix`] machinery)
//!   once a symbol-count threshold (`oh`) is reached without resolving.
//!
//! [`session::Session`] wires a [`config::Config`] to a byte stream end to
//! end and reports a [`metrics::Metrics`] record for the run. Every sampling
//! operation in the crate goes through the [`rng::RandomSource`] trait
//! rather than a process-global RNG, so a run is fully reproducible given a
//! seed.
//!
//! # Examples
//!
//! ```
//! use erasure_fountain::{Config, Session};
//! use erasure_fountain::rng::StdRngSource;
//!
//! let config = Config::unprecoded(8);
//! let mut session = Session::new(config, StdRngSource::from_seed(42))?;
//! let (recovered, metrics) = session.run_stream(&b"hi"[..])?;
//! assert_eq!(recovered, b"hi");
//! assert_eq!(metrics.source_blocks, 2);
//! # Ok::<(), erasure_fountain::Error>(())
//! ```

pub mod bitblock;
pub mod block_source;
pub mod bp;
pub mod config;
pub mod encoder;
pub mod error;
pub mod gauss;
pub mod gf2;
pub mod matrix;
pub mod metrics;
pub mod precode;
pub mod rng;
pub mod session;

pub use bitblock::BitBlock;
pub use block_source::BlockSource;
pub use bp::{BpDecoder, BpOutcome};
pub use config::Config;
pub use encoder::{EncodedSymbol, LtEncoder};
pub use error::{Error, Result};
pub use gauss::GaussianDecoder;
pub use matrix::ConstraintMatrix;
pub use metrics::Metrics;
pub use session::Session;
