//! # Symbol Store
//!
//! Fixed-capacity owner of raw source symbols on the encoder side. Slots are
//! addressed by symbol index and stay empty until written; overwrites are
//! allowed. Every stored buffer is exactly `symbol_size` bytes — validation
//! happens here, once, so the coding layers above never see a mismatched
//! buffer.

use bytes::Bytes;

use crate::config::CodingConfig;
use crate::error::CodingError;

/// Slot container for the symbols of one generation.
#[derive(Debug, Clone)]
pub struct SymbolStore {
    slots: Vec<Option<Bytes>>,
    symbol_size: usize,
}

impl SymbolStore {
    pub fn new(config: CodingConfig) -> Self {
        config.assert_valid();
        SymbolStore {
            slots: vec![None; config.max_symbols],
            symbol_size: config.max_symbol_size,
        }
    }

    /// Number of slots (set or not).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn symbol_size(&self) -> usize {
        self.symbol_size
    }

    /// Store a copy of `data` at `index`. Overwriting a slot is allowed.
    pub fn set(&mut self, index: usize, data: &[u8]) -> Result<(), CodingError> {
        if index >= self.capacity() {
            return Err(CodingError::Capacity {
                index,
                capacity: self.capacity(),
            });
        }
        if data.len() != self.symbol_size() {
            return Err(CodingError::SizeMismatch {
                expected: self.symbol_size(),
                actual: data.len(),
            });
        }
        self.slots[index] = Some(Bytes::copy_from_slice(data));
        Ok(())
    }

    /// Read the symbol at `index`.
    pub fn get(&self, index: usize) -> Result<&Bytes, CodingError> {
        if index >= self.capacity() {
            return Err(CodingError::Capacity {
                index,
                capacity: self.capacity(),
            });
        }
        self.slots[index]
            .as_ref()
            .ok_or(CodingError::NotPresent { index })
    }

    /// Panic-free peek used by the payload production path.
    pub(crate) fn slot(&self, index: usize) -> Option<&Bytes> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    pub fn contains(&self, index: usize) -> bool {
        self.slot(index).is_some()
    }

    /// Number of filled slots.
    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// True iff every slot is filled.
    pub fn all_present(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(symbols: usize, size: usize) -> SymbolStore {
        SymbolStore::new(CodingConfig {
            max_symbols: symbols,
            max_symbol_size: size,
        })
    }

    #[test]
    fn set_then_get() {
        let mut s = store(4, 3);
        assert_eq!(s.capacity(), 4);
        assert_eq!(s.symbol_size(), 3);
        s.set(2, &[7, 8, 9]).unwrap();
        assert_eq!(s.get(2).unwrap().as_ref(), &[7, 8, 9]);
        assert!(s.contains(2));
        assert_eq!(s.present_count(), 1);
    }

    #[test]
    fn set_out_of_range_is_capacity_error() {
        let mut s = store(4, 3);
        let err = s.set(4, &[0, 0, 0]).unwrap_err();
        assert_eq!(
            err,
            CodingError::Capacity {
                index: 4,
                capacity: 4
            }
        );
    }

    #[test]
    fn set_wrong_length_is_size_mismatch() {
        let mut s = store(4, 3);
        let err = s.set(0, &[1, 2]).unwrap_err();
        assert_eq!(
            err,
            CodingError::SizeMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn get_empty_slot_is_not_present() {
        let s = store(4, 3);
        assert_eq!(s.get(1).unwrap_err(), CodingError::NotPresent { index: 1 });
    }

    #[test]
    fn get_out_of_range_is_capacity_error() {
        let s = store(4, 3);
        assert!(matches!(
            s.get(9).unwrap_err(),
            CodingError::Capacity { index: 9, .. }
        ));
    }

    #[test]
    fn overwrite_is_allowed() {
        let mut s = store(2, 2);
        s.set(0, &[1, 1]).unwrap();
        s.set(0, &[2, 2]).unwrap();
        assert_eq!(s.get(0).unwrap().as_ref(), &[2, 2]);
        assert_eq!(s.present_count(), 1);
    }

    #[test]
    fn all_present_requires_every_slot() {
        let mut s = store(3, 1);
        s.set(0, &[0]).unwrap();
        s.set(2, &[2]).unwrap();
        assert!(!s.all_present(), "gap at index 1");
        s.set(1, &[1]).unwrap();
        assert!(s.all_present());
    }
}
