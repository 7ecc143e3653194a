//! Belief-propagation (peeling) decoder, with an optional precode-aware
//! escalation to Gaussian elimination once a symbol-count threshold is
//! reached without a pure peel resolving the block.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use crate::encoder::EncodedSymbol;
use crate::error::{Error, Result};
use crate::gauss::GaussianDecoder;
use crate::gf2::Gf2Matrix;
use crate::matrix::ConstraintMatrix;
use crate::precode;

/// The result of feeding one symbol to a [`BpDecoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BpOutcome {
    /// Not enough information yet to resolve every source bit.
    NotYet,
    /// All K source bits resolved, in index order.
    Decoded(Vec<bool>),
    /// The escalation threshold was reached and the precode-augmented
    /// Gaussian system was still underdetermined.
    Failed,
}

struct Waiting {
    coeffs: FixedBitSet,
    xor_val: bool,
}

/// Accumulates encoded symbols and resolves them by peeling; escalates to a
/// fresh [`GaussianDecoder`] over the precode-augmented system once `oh`
/// symbols have been processed without a decode.
pub struct BpDecoder<'g> {
    k: usize,
    g: Option<&'g ConstraintMatrix>,
    extended_len: usize,
    oh: Option<usize>,

    /// `known[i]` is `Some(bit)` once index `i` is resolved.
    known: Vec<Option<bool>>,
    waiting: Vec<Option<Waiting>>,
    /// `adjacency[i]` lists waiting slots that still reference index `i`.
    adjacency: Vec<Vec<usize>>,

    blocks_processed: usize,
    symbol_operations: usize,
    /// Set once escalation has been attempted for this block, to the outcome
    /// it produced: escalation is a single, terminal event per block, not a
    /// retry loop, so later calls to `add` replay this rather than
    /// re-escalating.
    escalated: Option<BpOutcome>,
}

impl<'g> BpDecoder<'g> {
    /// A fresh decoder for a K-bit source block, optionally aware of the
    /// LDPC constraint matrix `g` and an escalation threshold `oh`.
    pub fn new(k: usize, g: Option<&'g ConstraintMatrix>, oh: Option<usize>) -> Self {
        let extended_len = k + g.map_or(0, ConstraintMatrix::c);
        Self {
            k,
            g,
            extended_len,
            oh,
            known: vec![None; extended_len],
            waiting: Vec::new(),
            adjacency: vec![Vec::new(); extended_len],
            blocks_processed: 0,
            symbol_operations: 0,
            escalated: None,
        }
    }

    /// Number of symbols that have been run through [`Self::add`]
    /// (priming is not counted: it is derived for free from `G`, not
    /// received over the channel whose overhead this count measures).
    pub fn blocks_processed(&self) -> usize {
        self.blocks_processed
    }

    /// Total number of coefficient-elimination operations performed during
    /// peeling, across every call to [`Self::add`]/[`Self::prime`].
    pub fn symbol_operations(&self) -> usize {
        self.symbol_operations
    }

    /// Inject the `c` synthetic constraint symbols derived from `G`, if a
    /// constraint matrix was supplied.
    pub fn prime(&mut self) {
        let Some(g) = self.g else { return };
        for symbol in precode::prime_symbols(g) {
            self.absorb(&symbol);
        }
    }

    /// Feed one received symbol to the decoder.
    ///
    /// Once the escalation threshold `oh` is reached, escalation happens
    /// exactly once: the resulting [`BpOutcome::Decoded`] or
    /// [`BpOutcome::Failed`] is terminal for this block, and further calls
    /// to `add` keep returning that same outcome rather than re-escalating.
    pub fn add(&mut self, symbol: &EncodedSymbol) -> Result<BpOutcome> {
        if symbol.coefficients.is_empty() {
            return Err(Error::config("encoded symbol has degree zero"));
        }
        if symbol.coefficients.iter().any(|&i| i >= self.extended_len) {
            return Err(Error::config(format!(
                "coefficient out of range for extended length {}",
                self.extended_len
            )));
        }
        if let Some(outcome) = &self.escalated {
            return Ok(outcome.clone());
        }

        self.blocks_processed += 1;
        self.absorb(symbol);

        if let Some(bits) = self.decoded_bits() {
            return Ok(BpOutcome::Decoded(bits));
        }
        if let Some(oh) = self.oh {
            if self.blocks_processed == oh {
                let outcome = self.escalate()?;
                self.escalated = Some(outcome.clone());
                return Ok(outcome);
            }
        }
        Ok(BpOutcome::NotYet)
    }

    /// Register one symbol (new arrival or a primed constraint symbol) and
    /// run peeling to a fixed point.
    fn absorb(&mut self, symbol: &EncodedSymbol) {
        let mut coeffs = FixedBitSet::with_capacity(self.extended_len);
        for &i in &symbol.coefficients {
            coeffs.insert(i);
        }
        let mut xor_val = symbol.val;

        // Reduce against anything already known before filing the symbol.
        let already_known: Vec<usize> = coeffs
            .ones()
            .filter(|&i| self.known[i].is_some())
            .collect();
        for i in already_known {
            coeffs.set(i, false);
            xor_val ^= self.known[i].unwrap();
            self.symbol_operations += 1;
        }

        let mut queue = VecDeque::new();
        match coeffs.count_ones(..) {
            0 => return,
            1 => {
                let idx = coeffs.ones().next().unwrap();
                if self.known[idx].is_none() {
                    self.known[idx] = Some(xor_val);
                    queue.push_back(idx);
                }
            }
            _ => {
                let slot = self.waiting.len();
                for i in coeffs.ones() {
                    self.adjacency[i].push(slot);
                }
                self.waiting.push(Some(Waiting { coeffs, xor_val }));
            }
        }

        self.drain_queue(queue);
    }

    /// Propagate newly-known indices into waiting symbols until no further
    /// symbol resolves, touching each waiting entry only when one of its
    /// still-live coefficients is dequeued: O(edges) rather than a full
    /// rescan of `known` per resolution.
    fn drain_queue(&mut self, mut queue: VecDeque<usize>) {
        while let Some(idx) = queue.pop_front() {
            let value = self.known[idx].expect("queued index must be known");
            let slots = std::mem::take(&mut self.adjacency[idx]);
            for slot in slots {
                let Some(w) = self.waiting[slot].as_mut() else {
                    continue;
                };
                if !w.coeffs.contains(idx) {
                    continue;
                }
                w.coeffs.set(idx, false);
                w.xor_val ^= value;
                self.symbol_operations += 1;

                if w.coeffs.count_ones(..) == 1 {
                    let resolved_idx = w.coeffs.ones().next().unwrap();
                    let resolved_val = w.xor_val;
                    self.waiting[slot] = None;
                    if self.known[resolved_idx].is_none() {
                        self.known[resolved_idx] = Some(resolved_val);
                        queue.push_back(resolved_idx);
                    }
                }
            }
        }
    }

    /// If every source index `[0, K)` is known, the decoded bits in index
    /// order.
    fn decoded_bits(&self) -> Option<Vec<bool>> {
        if (0..self.k).all(|i| self.known[i].is_some()) {
            Some((0..self.k).map(|i| self.known[i].unwrap()).collect())
        } else {
            None
        }
    }

    /// Build the precode-augmented system and hand it to a fresh
    /// [`GaussianDecoder`]'s underlying [`Gf2Matrix`].
    fn escalate(&self) -> Result<BpOutcome> {
        log::warn!(
            "BP escalating to Gaussian elimination after {} symbols",
            self.blocks_processed
        );
        let mut matrix = Gf2Matrix::new(self.extended_len);

        if let Some(g) = self.g {
            for i in 0..g.c() {
                let mut row = FixedBitSet::with_capacity(self.extended_len);
                for j in g.column_ones(i) {
                    row.insert(j);
                }
                row.insert(self.k + i);
                matrix.add_row(row, false);
            }
        }

        for w in self.waiting.iter().flatten() {
            matrix.add_row(w.coeffs.clone(), w.xor_val);
        }

        for (idx, value) in self.known.iter().enumerate() {
            if let Some(v) = value {
                let mut row = FixedBitSet::with_capacity(self.extended_len);
                row.insert(idx);
                matrix.add_row(row, *v);
            }
        }

        match matrix.solve() {
            Ok(solution) => Ok(BpOutcome::Decoded(solution[..self.k].to_vec())),
            Err(Error::Underdetermined) => Ok(BpOutcome::Failed),
            Err(other) => Err(other),
        }
    }
}
