//! Metrics record describing one end-to-end run of the coding pipeline.

/// Summary statistics for a run, matching the metrics record in the design
/// document: block counts, overhead, and BP symbol-operation cost.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    /// Symbols per source block.
    pub k: usize,
    /// Whether the LDPC precode was enabled.
    pub precode: bool,
    /// Number of precode parity symbols (0 if `precode` is false).
    pub c: usize,
    /// Precode density (0.0 if `precode` is false).
    pub d: f64,
    /// Number of source blocks the stream was split into.
    pub source_blocks: usize,
    /// Total number of encoded symbols consumed across all blocks.
    pub processed_blocks: usize,
    /// Total BP peeling coefficient-elimination operations, summed across
    /// blocks (always 0 when the Gaussian decoder is used exclusively).
    pub symbol_operations: usize,
    /// The BP escalation threshold configured for the run, if any.
    pub escalation_threshold: Option<usize>,
    /// Number of blocks that failed to decode.
    pub failures: usize,
}

impl Metrics {
    /// A zeroed metrics record for a run with the given static parameters.
    pub fn new(k: usize, precode: bool, c: usize, d: f64, escalation_threshold: Option<usize>) -> Self {
        Self {
            k,
            precode,
            c,
            d,
            escalation_threshold,
            ..Default::default()
        }
    }

    /// Ratio of received/processed symbols to source blocks.
    ///
    /// Returns `0.0` rather than `NaN` when `source_blocks == 0`: an empty
    /// run is a legitimate boundary case and a reported zero is a less
    /// surprising failure mode for a caller than a silent `NaN` propagating
    /// into a printed table.
    pub fn overhead(&self) -> f64 {
        if self.source_blocks == 0 {
            0.0
        } else {
            self.processed_blocks as f64 / self.source_blocks as f64
        }
    }
}
