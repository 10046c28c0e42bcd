//! # Wire Format — Payload Codec
//!
//! One coded transmission unit travels encoder → decoder as:
//!
//! ```text
//! +--------------------------+---------------------------+
//! | coefficient bits         | coded symbol data         |
//! | ceil(max_symbols/8) B    | symbol_size B             |
//! +--------------------------+---------------------------+
//! ```
//!
//! Coefficient bits pack LSB-first (bit `i` lives in byte `i/8`, position
//! `i%8`). Both sides must share the same `CodingConfig`; the layout has no
//! self-describing header. Decoding from a short buffer yields `None`,
//! never a panic.

use bytes::{Buf, BufMut, BytesMut};

use crate::gf2::CoeffVec;

/// One coded transmission unit: which symbols are mixed, and the mix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Per-symbol GF(2) coefficients; bit `i` set means symbol `i`
    /// contributes to the data below.
    pub coefficients: CoeffVec,
    /// XOR combination of the contributing symbols.
    pub data: Vec<u8>,
}

impl Payload {
    /// Wire length for a given configuration.
    pub fn encoded_len(max_symbols: usize, symbol_size: usize) -> usize {
        CoeffVec::byte_len(max_symbols) + symbol_size
    }

    /// True iff exactly one symbol contributes — the payload carries that
    /// symbol verbatim.
    pub fn is_systematic(&self) -> bool {
        self.coefficients.count_ones() == 1
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(&self.coefficients.to_bytes());
        buf.put_slice(&self.data);
    }

    pub fn decode(buf: &mut impl Buf, max_symbols: usize, symbol_size: usize) -> Option<Self> {
        if buf.remaining() < Self::encoded_len(max_symbols, symbol_size) {
            return None;
        }
        let mut coeff_bytes = vec![0u8; CoeffVec::byte_len(max_symbols)];
        buf.copy_to_slice(&mut coeff_bytes);
        let coefficients = CoeffVec::from_bytes(max_symbols, &coeff_bytes);
        let mut data = vec![0u8; symbol_size];
        buf.copy_to_slice(&mut data);
        Some(Payload { coefficients, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> Payload {
        let mut coefficients = CoeffVec::zeros(10);
        coefficients.set(0);
        coefficients.set(9);
        Payload {
            coefficients,
            data: vec![0xDE, 0xAD, 0xBE, 0xEF],
        }
    }

    #[test]
    fn encoded_len_counts_bitmap_and_data() {
        assert_eq!(Payload::encoded_len(10, 4), 2 + 4);
        assert_eq!(Payload::encoded_len(8, 1), 1 + 1);
        assert_eq!(Payload::encoded_len(65, 16), 9 + 16);
    }

    #[test]
    fn roundtrip() {
        let p = sample_payload();
        let mut buf = BytesMut::new();
        p.encode(&mut buf);
        assert_eq!(buf.len(), Payload::encoded_len(10, 4));
        let back = Payload::decode(&mut &buf[..], 10, 4).expect("decode");
        assert_eq!(back, p);
    }

    #[test]
    fn truncated_buffer_yields_none() {
        let p = sample_payload();
        let mut buf = BytesMut::new();
        p.encode(&mut buf);
        for cut in 0..buf.len() {
            assert!(
                Payload::decode(&mut &buf[..cut], 10, 4).is_none(),
                "decode must reject {cut} of {} bytes",
                buf.len()
            );
        }
    }

    #[test]
    fn systematic_detection() {
        let mut p = sample_payload();
        assert!(!p.is_systematic());
        p.coefficients = CoeffVec::unit(10, 3);
        assert!(p.is_systematic());
    }

    #[test]
    fn stray_bits_in_last_coefficient_byte_are_ignored() {
        // 10-bit vector: byte 1 carries bits 8..10, upper six are padding.
        let bytes = [0x01u8, 0xFE, 1, 2, 3, 4];
        let p = Payload::decode(&mut &bytes[..], 10, 4).expect("decode");
        assert_eq!(p.coefficients.count_ones(), 2, "{:?}", p.coefficients);
        assert!(p.coefficients.get(0));
        assert!(p.coefficients.get(9));
    }
}
