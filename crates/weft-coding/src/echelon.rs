//! # Echelon State — Incremental Gaussian Elimination over GF(2)
//!
//! The decoder core. Every received payload is folded into a set of
//! (coefficient vector, symbol data) rows kept in *reduced* row-echelon
//! form: each row has a distinct pivot (its lowest set bit), and no other
//! row has that bit set. Rank is simply the row count.
//!
//! ## Absorption
//!
//! An incoming pair first has every claimed pivot column eliminated by
//! the row holding it. Either its coefficient vector dies (linearly
//! dependent — discarded, a normal outcome under redundant transmission)
//! or its lowest surviving bit claims a fresh pivot and the row is
//! inserted. Insertion is followed by eager back-reduction, so a row
//! collapses to a single-bit (systematic) vector at the earliest moment
//! the received equations allow — that is when its symbol becomes
//! individually recoverable.
//!
//! ## Determinism
//!
//! Pivot selection is always the lowest set bit and rows are kept ordered
//! by pivot, so the final state depends only on the *set* of payloads
//! absorbed, never on their arrival order.

use tracing::trace;

use crate::config::CodingConfig;
use crate::error::CodingError;
use crate::gf2::{xor_into, CoeffVec};

/// One equation: which symbols are mixed, and the mix itself.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EchelonRow {
    pivot: usize,
    coeffs: CoeffVec,
    data: Vec<u8>,
}

/// Reduced row-echelon accumulator for one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchelonMatrix {
    /// Rows ordered by pivot, one per claimed pivot column.
    rows: Vec<EchelonRow>,
    symbols: usize,
    symbol_size: usize,
}

impl EchelonMatrix {
    pub fn new(config: CodingConfig) -> Self {
        config.assert_valid();
        EchelonMatrix {
            rows: Vec::new(),
            symbols: config.max_symbols,
            symbol_size: config.max_symbol_size,
        }
    }

    pub fn symbols(&self) -> usize {
        self.symbols
    }

    pub fn symbol_size(&self) -> usize {
        self.symbol_size
    }

    /// Number of linearly independent equations held.
    pub fn rank(&self) -> usize {
        self.rows.len()
    }

    pub fn is_full_rank(&self) -> bool {
        self.rows.len() == self.symbols
    }

    /// Fold one (coefficients, data) pair into the echelon state.
    ///
    /// Returns `true` if the pair was innovative (rank rose by one) and
    /// `false` if it was linearly dependent on rows already held. The
    /// dependent case leaves the state untouched.
    pub fn absorb(&mut self, mut coeffs: CoeffVec, mut data: Vec<u8>) -> bool {
        debug_assert_eq!(coeffs.len(), self.symbols);
        debug_assert_eq!(data.len(), self.symbol_size);

        // Eliminate every claimed pivot column from the incoming row. Rows
        // are sorted by pivot and each holds the only set bit in its pivot
        // column, so one ascending pass reaches reduced form.
        for row in &self.rows {
            if coeffs.get(row.pivot) {
                coeffs.xor_assign(&row.coeffs);
                xor_into(&mut data, &row.data);
            }
        }

        let Some(pivot) = coeffs.pivot() else {
            trace!("dependent payload discarded at rank {}", self.rank());
            return false;
        };

        // Back-reduce: clear the new pivot bit from every earlier row so
        // each pivot column keeps exactly one set bit system-wide.
        for row in &mut self.rows {
            if row.coeffs.get(pivot) {
                row.coeffs.xor_assign(&coeffs);
                xor_into(&mut row.data, &data);
            }
        }

        let insert_at = self.rows.partition_point(|r| r.pivot < pivot);
        self.rows.insert(insert_at, EchelonRow { pivot, coeffs, data });
        true
    }

    /// True iff symbol `index` is held in original, single-bit form.
    pub fn is_symbol_uncoded(&self, index: usize) -> bool {
        match self.row_index(index) {
            Ok(i) => self.rows[i].coeffs.count_ones() == 1,
            Err(_) => false,
        }
    }

    /// Copy out one fully resolved symbol.
    pub fn copy_from_symbol(&self, index: usize) -> Result<Vec<u8>, CodingError> {
        if index >= self.symbols {
            return Err(CodingError::Capacity {
                index,
                capacity: self.symbols,
            });
        }
        match self.row_index(index) {
            Ok(i) if self.rows[i].coeffs.count_ones() == 1 => Ok(self.rows[i].data.clone()),
            _ => Err(CodingError::SymbolNotDecoded { index }),
        }
    }

    /// Copy out the whole generation, concatenated in index order.
    ///
    /// At full rank the reduced form is the identity, so row `i` holds
    /// symbol `i` verbatim.
    pub fn copy_from_symbols(&self) -> Result<Vec<u8>, CodingError> {
        if !self.is_full_rank() {
            return Err(CodingError::Incomplete {
                rank: self.rank(),
                symbols: self.symbols,
            });
        }
        let mut out = Vec::with_capacity(self.symbols * self.symbol_size);
        for row in &self.rows {
            out.extend_from_slice(&row.data);
        }
        Ok(out)
    }

    /// Bitmap of fully resolved symbol indices, as carried in feedback.
    pub fn decoded_bitmap(&self) -> CoeffVec {
        let mut bits = CoeffVec::zeros(self.symbols);
        for row in &self.rows {
            if row.coeffs.count_ones() == 1 {
                bits.set(row.pivot);
            }
        }
        bits
    }

    /// Number of fully resolved symbols.
    pub fn decoded_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.coeffs.count_ones() == 1)
            .count()
    }

    fn row_index(&self, pivot: usize) -> Result<usize, usize> {
        self.rows.binary_search_by_key(&pivot, |r| r.pivot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(symbols: usize, symbol_size: usize) -> EchelonMatrix {
        EchelonMatrix::new(CodingConfig {
            max_symbols: symbols,
            max_symbol_size: symbol_size,
        })
    }

    fn vec_of(len: usize, bits: &[usize]) -> CoeffVec {
        let mut v = CoeffVec::zeros(len);
        for &b in bits {
            v.set(b);
        }
        v
    }

    // ─── systematic absorption ──────────────────────────────────────────

    #[test]
    fn systematic_payload_decodes_immediately() {
        let mut m = matrix(4, 2);
        assert!(m.absorb(CoeffVec::unit(4, 2), vec![0xAB, 0xCD]));
        assert_eq!(m.rank(), 1);
        assert!(m.is_symbol_uncoded(2));
        assert!(!m.is_symbol_uncoded(0));
        assert_eq!(m.copy_from_symbol(2).unwrap(), vec![0xAB, 0xCD]);
    }

    #[test]
    fn full_set_of_unit_vectors_completes() {
        let mut m = matrix(3, 2);
        let symbols = [[1u8, 2], [3, 4], [5, 6]];
        for (i, s) in symbols.iter().enumerate() {
            assert!(m.absorb(CoeffVec::unit(3, i), s.to_vec()));
        }
        assert!(m.is_full_rank());
        assert_eq!(m.copy_from_symbols().unwrap(), vec![1, 2, 3, 4, 5, 6]);
    }

    // ─── coded absorption and elimination ───────────────────────────────

    #[test]
    fn full_rank_coded_triple_solves() {
        // A=[1,2] B=[3,4] C=[5,6]; mixes A^B, B^C, A^B^C.
        let mut m = matrix(3, 2);
        assert!(m.absorb(vec_of(3, &[0, 1]), vec![2, 6]));
        assert!(m.absorb(vec_of(3, &[1, 2]), vec![6, 2]));
        assert!(m.absorb(vec_of(3, &[0, 1, 2]), vec![7, 0]));

        assert_eq!(m.rank(), 3);
        assert!(m.is_full_rank());
        for i in 0..3 {
            assert!(m.is_symbol_uncoded(i), "symbol {i} should be resolved");
        }
        assert_eq!(m.copy_from_symbol(0).unwrap(), vec![1, 2]);
        assert_eq!(m.copy_from_symbol(1).unwrap(), vec![3, 4]);
        assert_eq!(m.copy_from_symbol(2).unwrap(), vec![5, 6]);
        assert_eq!(m.copy_from_symbols().unwrap(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn dependent_triple_stops_at_rank_two() {
        // Over GF(2), (A^B) ^ (B^C) = A^C: the third mix adds nothing.
        let mut m = matrix(3, 2);
        assert!(m.absorb(vec_of(3, &[0, 1]), vec![2, 6]));
        assert!(m.absorb(vec_of(3, &[1, 2]), vec![6, 2]));
        let before = m.clone();
        assert!(!m.absorb(vec_of(3, &[0, 2]), vec![4, 4]));
        assert_eq!(m.rank(), 2);
        assert_eq!(m, before, "dependent absorb must not touch the rows");
    }

    #[test]
    fn back_reduction_resolves_earlier_rows() {
        // A^B arrives first, then B alone; both must end up systematic.
        let mut m = matrix(2, 1);
        assert!(m.absorb(vec_of(2, &[0, 1]), vec![9 ^ 4]));
        assert!(!m.is_symbol_uncoded(0));
        assert!(m.absorb(CoeffVec::unit(2, 1), vec![4]));
        assert!(m.is_symbol_uncoded(0));
        assert!(m.is_symbol_uncoded(1));
        assert_eq!(m.copy_from_symbol(0).unwrap(), vec![9]);
        assert_eq!(m.copy_from_symbol(1).unwrap(), vec![4]);
    }

    #[test]
    fn late_mixed_row_sheds_already_claimed_pivots() {
        // B arrives alone, then A^B; the incoming row must be reduced by
        // B's pivot on absorption, not inserted still carrying it.
        let mut m = matrix(2, 1);
        assert!(m.absorb(CoeffVec::unit(2, 1), vec![4]));
        assert!(m.absorb(vec_of(2, &[0, 1]), vec![9 ^ 4]));
        assert!(m.is_full_rank());
        assert!(m.is_symbol_uncoded(0));
        assert!(m.is_symbol_uncoded(1));
        assert_eq!(m.copy_from_symbol(0).unwrap(), vec![9]);
        assert_eq!(m.copy_from_symbols().unwrap(), vec![9, 4]);
        assert_eq!(m.decoded_bitmap().count_ones(), 2);
    }

    #[test]
    fn duplicate_absorb_is_a_no_op() {
        let mut m = matrix(4, 2);
        assert!(m.absorb(vec_of(4, &[0, 3]), vec![1, 1]));
        let before = m.clone();
        assert!(!m.absorb(vec_of(4, &[0, 3]), vec![1, 1]));
        assert_eq!(m, before);
        assert_eq!(m.rank(), 1);
    }

    #[test]
    fn zero_vector_is_dependent() {
        let mut m = matrix(4, 2);
        assert!(!m.absorb(CoeffVec::zeros(4), vec![0, 0]));
        assert_eq!(m.rank(), 0);
    }

    #[test]
    fn order_independence_exact_state() {
        // B alone, A^B, B^C: every arrival order must converge to the same
        // reduced rows, including orders where the unit row lands first.
        let payloads = [
            (CoeffVec::unit(3, 1), vec![3u8, 4]),
            (vec_of(3, &[0, 1]), vec![2, 6]),
            (vec_of(3, &[1, 2]), vec![6, 2]),
        ];
        let orders: [[usize; 3]; 6] = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        let mut reference: Option<EchelonMatrix> = None;
        for order in orders {
            let mut m = matrix(3, 2);
            for &i in &order {
                let (c, d) = payloads[i].clone();
                m.absorb(c, d);
            }
            assert!(m.is_full_rank());
            assert_eq!(m.copy_from_symbols().unwrap(), vec![1, 2, 3, 4, 5, 6]);
            match &reference {
                Some(first) => {
                    assert_eq!(&m, first, "state diverged for arrival order {order:?}")
                }
                None => reference = Some(m),
            }
        }
    }

    // ─── error surface ──────────────────────────────────────────────────

    #[test]
    fn copy_before_decode_fails() {
        let mut m = matrix(3, 2);
        m.absorb(vec_of(3, &[0, 1]), vec![2, 6]);
        assert_eq!(
            m.copy_from_symbol(0).unwrap_err(),
            CodingError::SymbolNotDecoded { index: 0 }
        );
        assert_eq!(
            m.copy_from_symbols().unwrap_err(),
            CodingError::Incomplete {
                rank: 1,
                symbols: 3
            }
        );
    }

    #[test]
    fn copy_out_of_range_is_capacity_error() {
        let m = matrix(3, 2);
        assert!(matches!(
            m.copy_from_symbol(3).unwrap_err(),
            CodingError::Capacity {
                index: 3,
                capacity: 3
            }
        ));
    }

    #[test]
    fn rank_is_monotonic_and_bounded() {
        let mut m = matrix(3, 1);
        let mut last = 0;
        let mixes: [&[usize]; 6] = [&[0], &[0, 1], &[1], &[0, 1, 2], &[2], &[0, 2]];
        for bits in mixes {
            m.absorb(vec_of(3, bits), vec![0]);
            assert!(m.rank() >= last, "rank must never decrease");
            assert!(m.rank() <= 3, "rank must never exceed the symbol count");
            last = m.rank();
        }
        assert_eq!(m.rank(), 3);
    }

    #[test]
    fn decoded_bitmap_tracks_resolution() {
        let mut m = matrix(3, 1);
        m.absorb(CoeffVec::unit(3, 1), vec![7]);
        m.absorb(vec_of(3, &[0, 2]), vec![3]);
        let bits = m.decoded_bitmap();
        assert!(bits.get(1));
        assert!(!bits.get(0) && !bits.get(2));
        assert_eq!(m.decoded_count(), 1);
    }
}
