//! Glue layer: wires a [`Config`] together with a [`BlockSource`], a shared
//! [`ConstraintMatrix`] (when precoding is enabled), and a fresh
//! encoder/decoder pair per source block, accumulating a [`Metrics`] record
//! across the run.

use std::io::Read;

use crate::bitblock::BitBlock;
use crate::block_source::BlockSource;
use crate::config::Config;
use crate::encoder::LtEncoder;
use crate::error::{Error, Result};
use crate::gauss::GaussianDecoder;
use crate::bp::{BpDecoder, BpOutcome};
use crate::matrix::{ConstraintMatrix, DEFAULT_RESAMPLE_CAP};
use crate::metrics::Metrics;
use crate::precode;
use crate::rng::RandomSource;

/// A generous but finite cap on symbols drawn per block before giving up,
/// so a pathological configuration fails loudly instead of looping forever.
const MAX_SYMBOLS_PER_BLOCK: usize = 1_000_000;

/// Drives one run of the coding pipeline end to end: splits a byte stream
/// into K-bit blocks, (optionally) LDPC-precodes each, round-trips it
/// through a fresh LT encoder and the configured decoder, and reports
/// aggregate [`Metrics`].
pub struct Session<R> {
    config: Config,
    g: Option<ConstraintMatrix>,
    rng: R,
    metrics: Metrics,
}

impl<R: RandomSource> Session<R> {
    /// Build a session from a validated `config`, generating the shared
    /// constraint matrix up front if precoding is enabled.
    pub fn new(config: Config, mut rng: R) -> Result<Self> {
        config.validate()?;
        let g = if config.precode {
            Some(ConstraintMatrix::generate(
                config.k,
                config.c,
                config.d,
                &mut rng,
                DEFAULT_RESAMPLE_CAP,
            )?)
        } else {
            None
        };
        let metrics = Metrics::new(config.k, config.precode, config.c, config.d, config.oh);
        Ok(Self {
            config,
            g,
            rng,
            metrics,
        })
    }

    /// The constraint matrix generated for this session, if precoding is
    /// enabled.
    pub fn constraint_matrix(&self) -> Option<&ConstraintMatrix> {
        self.g.as_ref()
    }

    /// Metrics accumulated so far.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Round-trip one K-bit source block: precode it (if enabled), draw
    /// encoded symbols from a fresh [`LtEncoder`], and feed them to the
    /// configured decoder until the source bits are recovered.
    ///
    /// Updates `self.metrics` as it goes; on [`Error::DecodeFailed`] the
    /// block's symbol/operation counts are still folded in before the error
    /// is returned, so a caller inspecting `metrics()` after a failed run
    /// sees the true cost of the attempt.
    pub fn run_block(&mut self, block: &BitBlock) -> Result<Vec<bool>> {
        debug_assert_eq!(block.len(), self.config.k);
        self.metrics.source_blocks += 1;

        let symbols = match &self.g {
            Some(g) => precode::precode(block, g),
            None => block.clone(),
        };
        let k = self.config.k;
        let oh = self.config.oh;
        let mut encoder = LtEncoder::new(symbols, &mut self.rng);

        // Free functions rather than `&mut self` methods: `encoder` already
        // holds a mutable borrow of `self.rng`, so a helper taking the whole
        // session would conflict with it.
        let result = match &self.g {
            None => run_gauss(k, &mut encoder),
            Some(g) => run_bp(k, oh, g, &mut encoder),
        };

        match result {
            Ok((bits, processed, ops)) => {
                self.metrics.processed_blocks += processed;
                self.metrics.symbol_operations += ops;
                Ok(bits)
            }
            Err(err) => {
                self.metrics.failures += 1;
                Err(err)
            }
        }
    }

    /// Drive an entire byte stream: split into K-bit blocks via
    /// [`BlockSource`], round-trip each through [`Self::run_block`], and
    /// re-pack the recovered bits into bytes, trimming the final block's
    /// zero padding.
    ///
    /// A per-block [`Error::DecodeFailed`] does not abort the stream: it is
    /// already folded into `self.metrics.failures` by [`Self::run_block`],
    /// the failed block is emitted as all-zero bytes, and decoding
    /// continues with the next block. Every other error (a bad reader, a
    /// malformed symbol) is fatal and propagates immediately.
    pub fn run_stream<Rd: Read>(&mut self, reader: Rd) -> Result<(Vec<u8>, Metrics)> {
        let mut source = BlockSource::new(reader, self.config.k)?;
        let mut out = Vec::new();

        while let Some((block, pad_bits)) = source.next_block()? {
            let bits = match self.run_block(&block) {
                Ok(bits) => bits,
                Err(Error::DecodeFailed) => {
                    log::warn!("block failed to decode; emitting zero-filled bytes");
                    vec![false; self.config.k]
                }
                Err(other) => return Err(other),
            };
            let mut decoded = BitBlock::zeroed(bits.len());
            for (i, &b) in bits.iter().enumerate() {
                decoded.set(i, b);
            }
            let mut bytes = decoded.to_bytes();
            if pad_bits > 0 {
                let pad_bytes = pad_bits / 8;
                let new_len = bytes.len().saturating_sub(pad_bytes);
                bytes.truncate(new_len);
            }
            out.extend_from_slice(&bytes);
        }

        Ok((out, self.metrics.clone()))
    }
}

/// Draw symbols from `encoder` into a fresh [`GaussianDecoder`] until full
/// rank, then solve. Returns the decoded bits and the number of symbols
/// drawn (there is no BP-style operation count on this path).
fn run_gauss<R, D>(k: usize, encoder: &mut LtEncoder<R, D>) -> Result<(Vec<bool>, usize, usize)>
where
    R: RandomSource,
    D: crate::encoder::DegreeDistribution,
{
    let mut decoder = GaussianDecoder::new(k);
    let mut drawn = 0;
    while !decoder.is_full_rank() {
        if drawn >= MAX_SYMBOLS_PER_BLOCK {
            return Err(Error::DecodeFailed);
        }
        decoder.add(&encoder.generate())?;
        drawn += 1;
    }
    let bits = decoder.decode()?;
    Ok((bits, drawn, 0))
}

/// Prime a [`BpDecoder`] from `g` and draw symbols from `encoder` until it
/// decodes or its one escalation attempt at `oh` fails. Returns the decoded
/// bits, the number of symbols processed, and the total peeling operation
/// count.
fn run_bp<R, D>(
    k: usize,
    oh: Option<usize>,
    g: &ConstraintMatrix,
    encoder: &mut LtEncoder<R, D>,
) -> Result<(Vec<bool>, usize, usize)>
where
    R: RandomSource,
    D: crate::encoder::DegreeDistribution,
{
    let mut decoder = BpDecoder::new(k, Some(g), oh);
    decoder.prime();

    // `Failed` is a terminal outcome for this block: escalation runs exactly
    // once at `oh` and does not get retried with more symbols. The
    // symbol-count cap below only guards the no-escalation (`oh: None`)
    // case, where pure peeling could otherwise loop forever on a
    // pathological configuration.
    let decoded = loop {
        if decoder.blocks_processed() >= MAX_SYMBOLS_PER_BLOCK {
            break None;
        }
        let symbol = encoder.generate();
        match decoder.add(&symbol)? {
            BpOutcome::Decoded(bits) => break Some(bits),
            BpOutcome::Failed => break None,
            BpOutcome::NotYet => continue,
        }
    };

    let processed = decoder.blocks_processed();
    let ops = decoder.symbol_operations();
    match decoded {
        Some(bits) => Ok((bits, processed, ops)),
        None => Err(Error::DecodeFailed),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rng::StdRngSource;
    use std::io::Cursor;

    #[test]
    fn unprecoded_round_trip_single_block() {
        let config = Config::unprecoded(8);
        let mut session = Session::new(config, StdRngSource::from_seed(1)).unwrap();
        let block = BitBlock::from_bytes(&[0b1101_0010], 8);
        let bits = session.run_block(&block).unwrap();
        for i in 0..8 {
            assert_eq!(bits[i], block.get(i));
        }
        assert_eq!(session.metrics().source_blocks, 1);
        assert!(session.metrics().processed_blocks >= 8);
    }

    #[test]
    fn precoded_round_trip_single_block() {
        // No escalation threshold: pure peeling, primed with the precode's
        // constraint symbols, runs until it resolves rather than betting on
        // a single escalation attempt landing on a full-rank system.
        let config = Config::precoded(8, 3, 0.4, None).with_seed(2);
        let mut session = Session::new(config, StdRngSource::from_seed(2)).unwrap();
        let block = BitBlock::from_bytes(&[0b0110_1001], 8);
        let bits = session.run_block(&block).unwrap();
        for i in 0..8 {
            assert_eq!(bits[i], block.get(i));
        }
        assert_eq!(session.metrics().source_blocks, 1);
        assert_eq!(session.metrics().failures, 0);
    }

    #[test]
    fn stream_round_trip_multi_block_with_padding() {
        let config = Config::unprecoded(16);
        let mut session = Session::new(config, StdRngSource::from_seed(3)).unwrap();
        let input = vec![0x01, 0x02, 0x03, 0x04, 0x05];
        let (out, metrics) = session.run_stream(Cursor::new(input.clone())).unwrap();
        assert_eq!(out, input);
        assert_eq!(metrics.source_blocks, 3);
        assert_eq!(metrics.failures, 0);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = Config::unprecoded(7);
        assert!(Session::new(config, StdRngSource::from_seed(1)).is_err());
    }
}
