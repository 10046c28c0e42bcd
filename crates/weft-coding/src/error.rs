//! # Error Types
//!
//! Typed failures for store, matrix, and codec operations. All of them are
//! local, synchronous caller errors; nothing here is retryable by the core
//! itself. A linearly dependent payload is *not* an error — decoders absorb
//! it as a silent no-op.

use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────

/// Failures surfaced by encoders, decoders, and the symbol store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodingError {
    /// Symbol index at or beyond the configured capacity.
    #[error("symbol index {index} out of range (capacity {capacity})")]
    Capacity { index: usize, capacity: usize },

    /// Buffer length differs from the configured size: a symbol that is not
    /// `symbol_size` bytes, or a coefficient vector that does not cover
    /// `max_symbols` positions.
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Store slot read before any symbol was written to it.
    #[error("symbol {index} not present")]
    NotPresent { index: usize },

    /// Per-symbol copy requested before that symbol reduced to systematic
    /// form; check `is_symbol_uncoded` first.
    #[error("symbol {index} not yet decoded")]
    SymbolNotDecoded { index: usize },

    /// Bulk copy requested before the decoder reached full rank.
    #[error("decoding incomplete: rank {rank} of {symbols}")]
    Incomplete { rank: usize, symbols: usize },
}
