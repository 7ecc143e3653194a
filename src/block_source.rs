//! Converts a raw byte stream into a lazy, finite sequence of fixed-length
//! [`BitBlock`]s, padding (and reporting the pad length of) the final block.

use std::io::Read;

use crate::bitblock::BitBlock;
use crate::error::{Error, Result};

/// A byte-stream-backed source of fixed-length bit blocks.
///
/// `K` must be a positive multiple of 8 (a fatal [`Error::Config`] at
/// construction time otherwise), so each block is an exact whole number of
/// bytes on the wire.
pub struct BlockSource<R> {
    reader: R,
    k_bits: usize,
    k_bytes: usize,
    exhausted: bool,
}

impl<R: Read> BlockSource<R> {
    /// Wrap `reader`, emitting blocks of `k_bits` bits.
    pub fn new(reader: R, k_bits: usize) -> Result<Self> {
        if k_bits == 0 || k_bits % 8 != 0 {
            return Err(Error::config(format!(
                "K must be a positive multiple of 8, got {k_bits}"
            )));
        }
        Ok(Self {
            reader,
            k_bits,
            k_bytes: k_bits / 8,
            exhausted: false,
        })
    }

    /// The configured block length, in bits.
    pub fn block_len(&self) -> usize {
        self.k_bits
    }

    /// Read the next block.
    ///
    /// Returns `Ok(None)` once the stream is exhausted on a block boundary.
    /// A short final read is zero-padded on the right and returned together
    /// with its pad length in bits; the *next* call then returns `Ok(None)`.
    pub fn next_block(&mut self) -> Result<Option<(BitBlock, usize)>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut buf = vec![0u8; self.k_bytes];
        let mut filled = 0;
        while filled < self.k_bytes {
            let n = self.reader.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled == 0 {
            self.exhausted = true;
            return Ok(None);
        }

        let block = BitBlock::from_bytes(&buf, self.k_bits);
        if filled < self.k_bytes {
            self.exhausted = true;
            let pad_bits = (self.k_bytes - filled) * 8;
            log::debug!("final block padded with {pad_bits} zero bits");
            Ok(Some((block, pad_bits)))
        } else {
            Ok(Some((block, 0)))
        }
    }
}
