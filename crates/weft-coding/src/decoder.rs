//! # Decoders — Payload Absorption and Reconstruction
//!
//! Both variants wrap the same [`EchelonMatrix`] core; payloads are folded
//! in as they arrive, in any order, with duplicates and other linearly
//! dependent combinations absorbed as silent no-ops. The sliding-window
//! variant additionally tracks the symbol range it has observed and can
//! snapshot its progress as a [`FeedbackMessage`] for the encoder.

use tracing::debug;

use crate::config::CodingConfig;
use crate::echelon::EchelonMatrix;
use crate::error::CodingError;
use crate::feedback::{FeedbackMessage, FeedbackSource};
use crate::stats::DecoderStats;
use crate::wire::Payload;

/// Contract shared by every decoder variant.
pub trait Decoder {
    /// Generation capacity in symbols.
    fn symbols(&self) -> usize;

    /// Size of every symbol in bytes.
    fn symbol_size(&self) -> usize;

    /// Total bytes across a full generation.
    fn block_size(&self) -> usize {
        self.symbols() * self.symbol_size()
    }

    /// Wire length of every payload this decoder accepts.
    fn payload_size(&self) -> usize {
        Payload::encoded_len(self.symbols(), self.symbol_size())
    }

    /// Independent equations held so far.
    fn rank(&self) -> usize;

    /// True once every symbol of the generation is recoverable.
    fn is_complete(&self) -> bool;

    /// Fold one payload into the echelon state. Linearly dependent payloads
    /// succeed without changing anything.
    fn read_payload(&mut self, payload: Payload) -> Result<(), CodingError>;

    /// True iff symbol `index` is held in original, single-bit form.
    fn is_symbol_uncoded(&self, index: usize) -> bool;

    /// Copy out one fully resolved symbol.
    fn copy_from_symbol(&self, index: usize) -> Result<Vec<u8>, CodingError>;

    /// Copy out the whole generation, concatenated in index order. Only
    /// valid once complete.
    fn copy_from_symbols(&self) -> Result<Vec<u8>, CodingError>;

    fn stats(&self) -> &DecoderStats;
}

/// Shared ingestion path: validate sizes, absorb, keep counters.
fn absorb_payload(
    matrix: &mut EchelonMatrix,
    stats: &mut DecoderStats,
    payload: Payload,
) -> Result<(), CodingError> {
    if payload.coefficients.len() != matrix.symbols() {
        return Err(CodingError::SizeMismatch {
            expected: matrix.symbols(),
            actual: payload.coefficients.len(),
        });
    }
    if payload.data.len() != matrix.symbol_size() {
        return Err(CodingError::SizeMismatch {
            expected: matrix.symbol_size(),
            actual: payload.data.len(),
        });
    }
    stats.payloads_read += 1;
    if matrix.absorb(payload.coefficients, payload.data) {
        stats.innovative_payloads += 1;
        if matrix.is_full_rank() {
            debug!("decoding complete at rank {}", matrix.rank());
        }
    } else {
        stats.dependent_payloads += 1;
    }
    Ok(())
}

// ─── Full vector ─────────────────────────────────────────────────────────────

/// Decoder for a closed generation.
#[derive(Debug, Clone)]
pub struct FullVectorDecoder {
    matrix: EchelonMatrix,
    stats: DecoderStats,
}

impl FullVectorDecoder {
    pub fn new(config: CodingConfig) -> Self {
        FullVectorDecoder {
            matrix: EchelonMatrix::new(config),
            stats: DecoderStats::new(),
        }
    }
}

impl Decoder for FullVectorDecoder {
    fn symbols(&self) -> usize {
        self.matrix.symbols()
    }

    fn symbol_size(&self) -> usize {
        self.matrix.symbol_size()
    }

    fn rank(&self) -> usize {
        self.matrix.rank()
    }

    fn is_complete(&self) -> bool {
        self.matrix.is_full_rank()
    }

    fn read_payload(&mut self, payload: Payload) -> Result<(), CodingError> {
        absorb_payload(&mut self.matrix, &mut self.stats, payload)
    }

    fn is_symbol_uncoded(&self, index: usize) -> bool {
        self.matrix.is_symbol_uncoded(index)
    }

    fn copy_from_symbol(&self, index: usize) -> Result<Vec<u8>, CodingError> {
        self.matrix.copy_from_symbol(index)
    }

    fn copy_from_symbols(&self) -> Result<Vec<u8>, CodingError> {
        self.matrix.copy_from_symbols()
    }

    fn stats(&self) -> &DecoderStats {
        &self.stats
    }
}

// ─── Sliding window ──────────────────────────────────────────────────────────

/// Decoder for a windowed stream. Completion still means the whole
/// configured generation has been resolved; [`observed_symbols`] reports
/// how far the encoder's window has swept so far.
///
/// [`observed_symbols`]: SlidingWindowDecoder::observed_symbols
#[derive(Debug, Clone)]
pub struct SlidingWindowDecoder {
    matrix: EchelonMatrix,
    stats: DecoderStats,
    /// High-water mark of `highest referenced index + 1` over absorbed
    /// payloads.
    observed: usize,
}

impl SlidingWindowDecoder {
    pub fn new(config: CodingConfig) -> Self {
        SlidingWindowDecoder {
            matrix: EchelonMatrix::new(config),
            stats: DecoderStats::new(),
            observed: 0,
        }
    }

    /// Number of distinct symbol indices referenced by any payload so far.
    pub fn observed_symbols(&self) -> usize {
        self.observed
    }

    /// Fully resolved symbols, as reported in feedback.
    pub fn decoded_count(&self) -> usize {
        self.matrix.decoded_count()
    }
}

impl Decoder for SlidingWindowDecoder {
    fn symbols(&self) -> usize {
        self.matrix.symbols()
    }

    fn symbol_size(&self) -> usize {
        self.matrix.symbol_size()
    }

    fn rank(&self) -> usize {
        self.matrix.rank()
    }

    fn is_complete(&self) -> bool {
        self.matrix.is_full_rank()
    }

    fn read_payload(&mut self, payload: Payload) -> Result<(), CodingError> {
        let highest = payload.coefficients.highest_set();
        absorb_payload(&mut self.matrix, &mut self.stats, payload)?;
        // Only validated payloads move the high-water mark.
        if let Some(bit) = highest {
            if bit + 1 > self.observed {
                self.observed = bit + 1;
            }
        }
        Ok(())
    }

    fn is_symbol_uncoded(&self, index: usize) -> bool {
        self.matrix.is_symbol_uncoded(index)
    }

    fn copy_from_symbol(&self, index: usize) -> Result<Vec<u8>, CodingError> {
        self.matrix.copy_from_symbol(index)
    }

    fn copy_from_symbols(&self) -> Result<Vec<u8>, CodingError> {
        self.matrix.copy_from_symbols()
    }

    fn stats(&self) -> &DecoderStats {
        &self.stats
    }
}

impl FeedbackSource for SlidingWindowDecoder {
    fn write_feedback(&mut self) -> FeedbackMessage {
        self.stats.feedback_writes += 1;
        FeedbackMessage {
            rank: self.matrix.rank() as u16,
            decoded: self.matrix.decoded_bitmap(),
        }
    }

    fn feedback_size(&self) -> usize {
        FeedbackMessage::encoded_len(self.matrix.symbols())
    }
}
