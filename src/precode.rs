//! LDPC precode: appends `c` parity bits to a source block, each the XOR of
//! a low-density set of source bits selected by a column of the constraint
//! matrix.

use crate::bitblock::BitBlock;
use crate::encoder::EncodedSymbol;
use crate::matrix::ConstraintMatrix;

/// Append `g.c()` parity bits to `block`, one per column of `g`: parity bit
/// `i` is the XOR of the source bits at the rows where `g`'s column `i` is
/// set.
///
/// # Panics
/// Panics if `block.len() != g.k()`.
pub fn precode(block: &BitBlock, g: &ConstraintMatrix) -> BitBlock {
    assert_eq!(block.len(), g.k(), "block length must match G's row count");
    let parity: Vec<bool> = (0..g.c())
        .map(|i| block.xor_at(g.column_ones(i)))
        .collect();
    block.extended_with(&parity)
}

/// Build the `c` synthetic constraint symbols the BP decoder primes its
/// peeler with: for column `i`, coefficients are the source rows where `G`'s
/// column `i` is set, plus the parity index `K+i`, with `val = 0` (the
/// precode's defining identity).
pub fn prime_symbols(g: &ConstraintMatrix) -> Vec<EncodedSymbol> {
    let intermediate_len = g.k() + g.c();
    let zero_intermediate = BitBlock::zeroed(intermediate_len);
    (0..g.c())
        .map(|i| {
            let mut coeffs: Vec<usize> = g.column_ones(i).collect();
            coeffs.push(g.k() + i);
            // val is always 0 by construction: `zero_intermediate` only
            // serves as a typed zero to satisfy EncodedSymbol::new's
            // computed-val contract.
            EncodedSymbol::new(coeffs, &zero_intermediate)
        })
        .collect()
}
