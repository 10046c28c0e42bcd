//! # Coding Configuration
//!
//! Capacity bounds shared by every encoder and decoder kind. Both sides of a
//! transfer must be constructed from the same values or payloads will fail
//! size validation at the decoder.

/// Construction-time bounds for a generation or window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodingConfig {
    /// Number of symbol slots in a generation, indexed `0..max_symbols`.
    /// Capped at 65535 so the feedback rank fits a `u16` on the wire.
    pub max_symbols: usize,
    /// Exact size of every symbol in bytes.
    pub max_symbol_size: usize,
}

impl Default for CodingConfig {
    fn default() -> Self {
        CodingConfig {
            max_symbols: 32,
            max_symbol_size: 1024,
        }
    }
}

impl CodingConfig {
    /// Total bytes across a full generation.
    pub fn block_size(&self) -> usize {
        self.max_symbols * self.max_symbol_size
    }

    /// Constructor-time invariants, enforced by panic.
    pub(crate) fn assert_valid(&self) {
        assert!(self.max_symbols > 0, "max_symbols must be positive");
        assert!(
            self.max_symbols <= u16::MAX as usize,
            "max_symbols {} exceeds the wire rank limit {}",
            self.max_symbols,
            u16::MAX
        );
        assert!(self.max_symbol_size > 0, "max_symbol_size must be positive");
    }
}
