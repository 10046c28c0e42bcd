//! # Encoders — Systematic and Coded Payload Production
//!
//! Two variants share one production core and differ only in which index
//! range they are allowed to mix:
//!
//! - [`FullVectorEncoder`] — a closed generation; every payload may span all
//!   admitted symbols.
//! - [`SlidingWindowEncoder`] — an open stream; payloads span the active
//!   window `[low, high)`, with `low` advanced by decoder feedback and
//!   `high` by newly admitted symbols.
//!
//! ## Payload policy
//!
//! While the systematic phase is on, each admitted symbol is sent once in
//! verbatim (unit-vector) form — zero-overhead delivery. All further
//! requests produce coded payloads: coefficient bits drawn uniformly at
//! random over the symbols currently set (intersected with the window for
//! the sliding variant), never all-zero while any symbol is eligible.
//! Seeded construction makes the entire payload stream reproducible.

use std::ops::Range;

use rand::RngExt as _;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::config::CodingConfig;
use crate::error::CodingError;
use crate::feedback::{FeedbackMessage, FeedbackSink};
use crate::gf2::{xor_into, CoeffVec};
use crate::stats::EncoderStats;
use crate::store::SymbolStore;
use crate::wire::Payload;

/// Contract shared by every encoder variant.
pub trait Encoder {
    /// Generation capacity in symbols.
    fn symbols(&self) -> usize;

    /// Size of every symbol in bytes.
    fn symbol_size(&self) -> usize;

    /// Total bytes across a full generation.
    fn block_size(&self) -> usize {
        self.symbols() * self.symbol_size()
    }

    /// Wire length of every payload this encoder writes.
    fn payload_size(&self) -> usize {
        Payload::encoded_len(self.symbols(), self.symbol_size())
    }

    /// Symbols admitted so far.
    fn rank(&self) -> usize;

    /// Admit one source symbol. Re-admitting an index queues it for one
    /// more systematic pass.
    fn set_const_symbol(&mut self, index: usize, data: &[u8]) -> Result<(), CodingError>;

    /// Admit a whole block, split into consecutive symbols from index 0.
    /// The block must be a non-empty multiple of the symbol size and fit
    /// the generation; a rejected block admits nothing.
    fn set_symbols(&mut self, block: &[u8]) -> Result<(), CodingError> {
        let size = self.symbol_size();
        if block.is_empty() || block.len() % size != 0 {
            return Err(CodingError::SizeMismatch {
                expected: size,
                actual: block.len(),
            });
        }
        if block.len() > self.block_size() {
            return Err(CodingError::Capacity {
                index: self.symbols(),
                capacity: self.symbols(),
            });
        }
        for (index, chunk) in block.chunks(size).enumerate() {
            self.set_const_symbol(index, chunk)?;
        }
        Ok(())
    }

    /// Produce the next payload per the policy above.
    fn write_payload(&mut self) -> Payload;

    /// Whether the systematic phase is active.
    fn is_systematic_on(&self) -> bool;

    /// Resume sending not-yet-sent symbols verbatim before coding.
    fn set_systematic_on(&mut self);

    /// Force every subsequent payload to be coded.
    fn set_systematic_off(&mut self);

    fn stats(&self) -> &EncoderStats;
}

// ─── Shared production core ─────────────────────────────────────────────────

/// Symbol ownership, systematic bookkeeping, and the seeded coefficient
/// draw. Variants delegate here with their own window bounds.
#[derive(Debug)]
struct EncoderCore {
    store: SymbolStore,
    config: CodingConfig,
    rng: StdRng,
    /// Per-index flag: sent in verbatim form since it was last (re)set.
    systematic_sent: Vec<bool>,
    systematic_on: bool,
    stats: EncoderStats,
}

impl EncoderCore {
    fn new(config: CodingConfig, seed: u64) -> Self {
        config.assert_valid();
        EncoderCore {
            store: SymbolStore::new(config),
            config,
            rng: StdRng::seed_from_u64(seed),
            systematic_sent: vec![false; config.max_symbols],
            systematic_on: true,
            stats: EncoderStats::new(),
        }
    }

    fn set_symbol(&mut self, index: usize, data: &[u8]) -> Result<(), CodingError> {
        self.store.set(index, data)?;
        self.systematic_sent[index] = false;
        self.stats.symbols_set += 1;
        Ok(())
    }

    fn write_payload(&mut self, window: Range<usize>) -> Payload {
        if self.systematic_on {
            for index in window.clone() {
                if self.systematic_sent[index] {
                    continue;
                }
                let Some(symbol) = self.store.slot(index) else {
                    continue;
                };
                let data = symbol.to_vec();
                self.systematic_sent[index] = true;
                self.stats.systematic_payloads += 1;
                return Payload {
                    coefficients: CoeffVec::unit(self.config.max_symbols, index),
                    data,
                };
            }
        }
        self.coded_payload(window)
    }

    /// Random combination over the set symbols inside `window`. The draw is
    /// repaired to a non-zero vector whenever any symbol is eligible; with
    /// none, the payload is the all-zero vector and carries nothing.
    fn coded_payload(&mut self, window: Range<usize>) -> Payload {
        let eligible: Vec<usize> = window.filter(|&i| self.store.contains(i)).collect();

        let mut coefficients = CoeffVec::zeros(self.config.max_symbols);
        for &index in &eligible {
            if self.rng.random::<bool>() {
                coefficients.set(index);
            }
        }
        if coefficients.is_zero() && !eligible.is_empty() {
            let pick = eligible[(self.rng.random::<u64>() % eligible.len() as u64) as usize];
            coefficients.set(pick);
        }

        let mut data = vec![0u8; self.config.max_symbol_size];
        for index in coefficients.ones() {
            if let Some(symbol) = self.store.slot(index) {
                xor_into(&mut data, symbol);
            }
        }
        self.stats.coded_payloads += 1;
        Payload { coefficients, data }
    }
}

// ─── Full vector ─────────────────────────────────────────────────────────────

/// Encoder over a closed generation: once all symbols are admitted, every
/// payload is a random combination of the whole set. Consumes no feedback
/// and keeps producing coded payloads indefinitely on request.
#[derive(Debug)]
pub struct FullVectorEncoder {
    core: EncoderCore,
}

impl FullVectorEncoder {
    pub fn new(config: CodingConfig, seed: u64) -> Self {
        FullVectorEncoder {
            core: EncoderCore::new(config, seed),
        }
    }
}

impl Encoder for FullVectorEncoder {
    fn symbols(&self) -> usize {
        self.core.config.max_symbols
    }

    fn symbol_size(&self) -> usize {
        self.core.config.max_symbol_size
    }

    fn rank(&self) -> usize {
        self.core.store.present_count()
    }

    fn set_const_symbol(&mut self, index: usize, data: &[u8]) -> Result<(), CodingError> {
        self.core.set_symbol(index, data)
    }

    fn write_payload(&mut self) -> Payload {
        self.core.write_payload(0..self.core.config.max_symbols)
    }

    fn is_systematic_on(&self) -> bool {
        self.core.systematic_on
    }

    fn set_systematic_on(&mut self) {
        self.core.systematic_on = true;
    }

    fn set_systematic_off(&mut self) {
        self.core.systematic_on = false;
    }

    fn stats(&self) -> &EncoderStats {
        &self.core.stats
    }
}

// ─── Sliding window ──────────────────────────────────────────────────────────

/// Encoder over an advancing window `[low, high)`. New symbols extend
/// `high`; decoder feedback retires the confirmed prefix at `low`. Payloads
/// never reference a symbol outside the window.
#[derive(Debug)]
pub struct SlidingWindowEncoder {
    core: EncoderCore,
    low: usize,
    high: usize,
}

impl SlidingWindowEncoder {
    pub fn new(config: CodingConfig, seed: u64) -> Self {
        SlidingWindowEncoder {
            core: EncoderCore::new(config, seed),
            low: 0,
            high: 0,
        }
    }

    /// Active coding window as `[low, high)`.
    pub fn window(&self) -> Range<usize> {
        self.low..self.high
    }
}

impl Encoder for SlidingWindowEncoder {
    fn symbols(&self) -> usize {
        self.core.config.max_symbols
    }

    fn symbol_size(&self) -> usize {
        self.core.config.max_symbol_size
    }

    fn rank(&self) -> usize {
        self.core.store.present_count()
    }

    fn set_const_symbol(&mut self, index: usize, data: &[u8]) -> Result<(), CodingError> {
        self.core.set_symbol(index, data)?;
        if index >= self.high {
            self.high = index + 1;
        }
        Ok(())
    }

    fn write_payload(&mut self) -> Payload {
        self.core.write_payload(self.low..self.high)
    }

    fn is_systematic_on(&self) -> bool {
        self.core.systematic_on
    }

    fn set_systematic_on(&mut self) {
        self.core.systematic_on = true;
    }

    fn set_systematic_off(&mut self) {
        self.core.systematic_on = false;
    }

    fn stats(&self) -> &EncoderStats {
        &self.core.stats
    }
}

impl FeedbackSink for SlidingWindowEncoder {
    fn read_feedback(&mut self, feedback: &FeedbackMessage) {
        self.core.stats.feedback_reads += 1;
        let start = self.low;
        // Retire only the contiguous confirmed prefix; a gap stops the
        // advance so nothing undecodable ever leaves the window.
        while self.low < self.high && feedback.decoded.get(self.low) {
            self.low += 1;
        }
        let advanced = self.low - start;
        if advanced > 0 {
            self.core.stats.symbols_retired += advanced as u64;
            debug!(
                "window retired {advanced} symbols, now [{}, {})",
                self.low, self.high
            );
        }
    }

    fn feedback_size(&self) -> usize {
        FeedbackMessage::encoded_len(self.core.config.max_symbols)
    }
}
