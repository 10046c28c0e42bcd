//! # Coding Statistics
//!
//! Per-instance counters for encoders and decoders, designed for JSON
//! serialization. Counters only ever grow; the embedding application decides
//! when to snapshot and diff them.

use serde::Serialize;

// ─── Encoder Stats ───────────────────────────────────────────────────────────

/// Counters kept by every encoder.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EncoderStats {
    /// Source symbols admitted via `set_const_symbol` (overwrites included).
    pub symbols_set: u64,
    /// Payloads emitted carrying one symbol verbatim.
    pub systematic_payloads: u64,
    /// Payloads emitted as random combinations.
    pub coded_payloads: u64,
    /// Feedback messages consumed (sliding window only).
    pub feedback_reads: u64,
    /// Symbols retired from the window low end (sliding window only).
    pub symbols_retired: u64,
}

impl EncoderStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total payloads produced.
    pub fn payloads_written(&self) -> u64 {
        self.systematic_payloads + self.coded_payloads
    }

    /// Share of payloads that were overhead-free systematic sends.
    pub fn systematic_ratio(&self) -> f64 {
        let total = self.payloads_written();
        if total == 0 {
            0.0
        } else {
            self.systematic_payloads as f64 / total as f64
        }
    }
}

// ─── Decoder Stats ───────────────────────────────────────────────────────────

/// Counters kept by every decoder.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DecoderStats {
    /// Payloads accepted by `read_payload` (valid sizes).
    pub payloads_read: u64,
    /// Payloads that raised the rank.
    pub innovative_payloads: u64,
    /// Payloads discarded as linearly dependent.
    pub dependent_payloads: u64,
    /// Feedback messages produced (sliding window only).
    pub feedback_writes: u64,
}

impl DecoderStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of received payloads that carried no new information.
    pub fn redundancy_ratio(&self) -> f64 {
        if self.payloads_read == 0 {
            0.0
        } else {
            self.dependent_payloads as f64 / self.payloads_read as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_guard_division_by_zero() {
        assert_eq!(EncoderStats::new().systematic_ratio(), 0.0);
        assert_eq!(DecoderStats::new().redundancy_ratio(), 0.0);
    }

    #[test]
    fn payload_total_sums_both_kinds() {
        let stats = EncoderStats {
            systematic_payloads: 4,
            coded_payloads: 6,
            ..Default::default()
        };
        assert_eq!(stats.payloads_written(), 10);
        assert!((stats.systematic_ratio() - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn stats_serialize_to_json() {
        let stats = DecoderStats {
            payloads_read: 7,
            innovative_payloads: 5,
            dependent_payloads: 2,
            feedback_writes: 3,
        };
        let json = serde_json::to_string(&stats).expect("serialize");
        assert!(json.contains("\"payloads_read\":7"), "{json}");
        assert!(json.contains("\"dependent_payloads\":2"), "{json}");
    }
}
