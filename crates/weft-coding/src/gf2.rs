//! # GF(2) Arithmetic — Binary-Field Coding Primitives
//!
//! Random linear coding over GF(2): every coefficient is a single bit,
//! addition is XOR, and multiplication by a coefficient is either the
//! identity (1) or the zero map (0). Elimination therefore never needs
//! multiplicative inverses — XOR cancellation is the whole field.
//!
//! Two primitives live here:
//!
//! - [`combine`] — conditional XOR of one symbol buffer into an accumulator
//! - [`CoeffVec`] — a dense bit-vector of per-symbol coefficients, packed
//!   into `u64` words

use std::fmt;

/// XOR `symbol` into `acc` when `coeff_bit` is set; leave `acc` untouched
/// otherwise.
///
/// Both buffers must have the same length. The operation is total and
/// self-inverse: applying the same combination twice restores `acc`.
pub fn combine(coeff_bit: bool, acc: &mut [u8], symbol: &[u8]) {
    debug_assert_eq!(acc.len(), symbol.len());
    if coeff_bit {
        xor_into(acc, symbol);
    }
}

/// Unconditional byte-wise XOR of `src` into `dst`.
pub(crate) fn xor_into(dst: &mut [u8], src: &[u8]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

// ─── Coefficient Vector ─────────────────────────────────────────────────────

/// Dense bit-vector of coding coefficients, one bit per symbol slot.
///
/// Bit `i` set means "symbol `i` contributes to this combination". A vector
/// with exactly one bit set is a systematic (uncoded) representation of that
/// symbol. Bits are stored LSB-first in `u64` words; the same LSB-first
/// order is used when packing to bytes for the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct CoeffVec {
    words: Vec<u64>,
    len: usize,
}

impl CoeffVec {
    /// All-zero vector covering `len` symbol positions.
    pub fn zeros(len: usize) -> Self {
        CoeffVec {
            words: vec![0u64; len.div_ceil(64)],
            len,
        }
    }

    /// Unit vector: only bit `index` set.
    pub fn unit(len: usize, index: usize) -> Self {
        let mut v = Self::zeros(len);
        v.set(index);
        v
    }

    /// Number of symbol positions covered (not the number of set bits).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read bit `index`. Out-of-range reads are `false`.
    pub fn get(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.words[index / 64] >> (index % 64) & 1 == 1
    }

    /// Set bit `index`.
    pub fn set(&mut self, index: usize) {
        assert!(index < self.len, "bit {index} out of range ({})", self.len);
        self.words[index / 64] |= 1u64 << (index % 64);
    }

    /// Clear bit `index`.
    pub fn clear(&mut self, index: usize) {
        assert!(index < self.len, "bit {index} out of range ({})", self.len);
        self.words[index / 64] &= !(1u64 << (index % 64));
    }

    /// XOR `other` into `self`. GF(2) vector addition.
    pub fn xor_assign(&mut self, other: &Self) {
        debug_assert_eq!(self.len, other.len);
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a ^= b;
        }
    }

    /// Index of the lowest set bit — the pivot position for elimination.
    pub fn pivot(&self) -> Option<usize> {
        for (w, &word) in self.words.iter().enumerate() {
            if word != 0 {
                return Some(w * 64 + word.trailing_zeros() as usize);
            }
        }
        None
    }

    /// Index of the highest set bit.
    pub fn highest_set(&self) -> Option<usize> {
        for (w, &word) in self.words.iter().enumerate().rev() {
            if word != 0 {
                return Some(w * 64 + 63 - word.leading_zeros() as usize);
            }
        }
        None
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Iterate the indices of set bits in ascending order.
    pub fn ones(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            current: self.words.first().copied().unwrap_or(0),
            word_idx: 0,
        }
    }

    /// Bytes needed to carry `len` bits on the wire.
    pub fn byte_len(len: usize) -> usize {
        len.div_ceil(8)
    }

    /// Pack into `byte_len(len)` bytes, LSB-first within each byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        (0..Self::byte_len(self.len))
            .map(|j| (self.words[j / 8] >> ((j % 8) * 8)) as u8)
            .collect()
    }

    /// Unpack from exactly `byte_len(len)` bytes. Bits at or beyond `len`
    /// in the final byte are ignored.
    pub fn from_bytes(len: usize, bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), Self::byte_len(len));
        let mut v = Self::zeros(len);
        for (j, &b) in bytes.iter().enumerate() {
            v.words[j / 8] |= (b as u64) << ((j % 8) * 8);
        }
        // Mask stray bits past the end so equality and is_zero stay exact.
        if len % 64 != 0 {
            if let Some(last) = v.words.last_mut() {
                *last &= (1u64 << (len % 64)) - 1;
            }
        }
        v
    }
}

impl fmt::Debug for CoeffVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CoeffVec(")?;
        for i in 0..self.len {
            write!(f, "{}", if self.get(i) { '1' } else { '0' })?;
        }
        write!(f, ")")
    }
}

/// Iterator over set bit indices, lowest first.
pub struct Ones<'a> {
    words: &'a [u64],
    current: u64,
    word_idx: usize,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.word_idx += 1;
            if self.word_idx >= self.words.len() {
                return None;
            }
            self.current = self.words[self.word_idx];
        }
        let bit = self.current.trailing_zeros() as usize;
        self.current &= self.current - 1;
        Some(self.word_idx * 64 + bit)
    }
}
