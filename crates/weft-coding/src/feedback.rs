//! # Feedback Protocol
//!
//! Decoder → encoder progress report, spoken only by the sliding-window
//! variants:
//!
//! ```text
//! +---------+--------------------------+
//! | rank    | decoded bitmap           |
//! | u16 BE  | ceil(max_symbols/8) B    |
//! +---------+--------------------------+
//! ```
//!
//! Bit `i` of the bitmap is set when the decoder holds symbol `i` in
//! original, single-bit form. The encoder uses the bitmap to retire the
//! confirmed prefix of its window; the rank is informational.
//!
//! Capability is expressed through traits rather than probing: a driver
//! that runs the feedback leg bounds its types by [`FeedbackSink`] and
//! [`FeedbackSource`], which only the sliding-window encoder and decoder
//! implement.

use bytes::{Buf, BufMut, BytesMut};

use crate::gf2::CoeffVec;

/// Snapshot of decoder progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackMessage {
    /// Independent equations held by the decoder.
    pub rank: u16,
    /// Bit `i` set when symbol `i` is fully resolved at the decoder.
    pub decoded: CoeffVec,
}

impl FeedbackMessage {
    /// Wire length for a given configuration.
    pub fn encoded_len(max_symbols: usize) -> usize {
        2 + CoeffVec::byte_len(max_symbols)
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u16(self.rank);
        buf.put_slice(&self.decoded.to_bytes());
    }

    pub fn decode(buf: &mut impl Buf, max_symbols: usize) -> Option<Self> {
        if buf.remaining() < Self::encoded_len(max_symbols) {
            return None;
        }
        let rank = buf.get_u16();
        let mut bitmap = vec![0u8; CoeffVec::byte_len(max_symbols)];
        buf.copy_to_slice(&mut bitmap);
        Some(FeedbackMessage {
            rank,
            decoded: CoeffVec::from_bytes(max_symbols, &bitmap),
        })
    }
}

/// Consumes decoder feedback to advance an encoding window.
///
/// Implemented only by the sliding-window encoder; full-vector encoders
/// have no feedback leg at all.
pub trait FeedbackSink {
    /// Fold a progress report into window state.
    fn read_feedback(&mut self, feedback: &FeedbackMessage);

    /// Wire length of the feedback messages this sink expects.
    fn feedback_size(&self) -> usize;
}

/// Produces feedback describing decode progress.
///
/// Implemented only by the sliding-window decoder.
pub trait FeedbackSource {
    /// Snapshot current progress as a wire-ready message.
    fn write_feedback(&mut self) -> FeedbackMessage;

    /// Wire length of the messages this source produces.
    fn feedback_size(&self) -> usize;
}
