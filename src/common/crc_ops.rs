//! Table-driven CRC-8 (SAE J1850).
//!
//! | Parameter  | Value |
//! |------------|-------|
//! | Polynomial | 0x1D  |
//! | Init       | 0xFF  |
//! | RefIn      | false |
//! | RefOut     | false |
//! | XorOut     | 0xFF  |
//!
//! Parameters come from the `crc` crate catalog entry.

use crc::{Algorithm, CRC_8_SAE_J1850};
use std::sync::{Arc, OnceLock};

/// Catalog entry the lookup table is generated from.
pub const J1850_ALGO: Algorithm<u8> = CRC_8_SAE_J1850;

/// Canonical start value for a fresh J1850 checksum.
pub const J1850_START_VALUE: u8 = 0xFF;

const TABLE_SIZE: usize = 256;

/// Precomputed 256-entry lookup table for the J1850 polynomial.
#[derive(Clone, PartialEq, Eq)]
pub struct Crc8Table([u8; TABLE_SIZE]);

impl Crc8Table {
    /// Build the table bit by bit: shift left, XOR the polynomial when the
    /// top bit falls out.
    pub fn generate() -> Self {
        let mut table = [0u8; TABLE_SIZE];
        for (value, entry) in table.iter_mut().enumerate() {
            let mut crc = value as u8;
            for _ in 0..8 {
                crc = if crc & 0x80 != 0 {
                    (crc << 1) ^ J1850_ALGO.poly
                } else {
                    crc << 1
                };
            }
            *entry = crc;
        }
        Self(table)
    }

    pub fn as_array(&self) -> &[u8; TABLE_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for Crc8Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crc8Table")
            .field("poly", &J1850_ALGO.poly)
            .finish_non_exhaustive()
    }
}

/// Process-wide table, generated on first use and shared read-only afterwards.
pub fn j1850_table() -> Arc<Crc8Table> {
    static TABLE: OnceLock<Arc<Crc8Table>> = OnceLock::new();
    TABLE
        .get_or_init(|| Arc::new(Crc8Table::generate()))
        .clone()
}

/// CRC-8 J1850 engine bound to a lookup table.
#[derive(Clone, Debug)]
pub struct Crc8J1850 {
    table: Arc<Crc8Table>,
}

impl Default for Crc8J1850 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc8J1850 {
    /// Engine sharing the process-wide table.
    pub fn new() -> Self {
        Self {
            table: j1850_table(),
        }
    }

    /// Engine using a caller supplied table.
    pub fn with_table(table: Arc<Crc8Table>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &[u8; TABLE_SIZE] {
        self.table.as_array()
    }

    /// Compute the J1850 checksum of `data`.
    ///
    /// With `is_first_call` set, `start_value` is the initial register
    /// (normally [`J1850_START_VALUE`]). Otherwise `start_value` is the result
    /// of a previous call over an earlier fragment of the same message, so
    /// one logical checksum can span several slices:
    ///
    /// ```
    /// use e2e_p11::crc_ops::{Crc8J1850, J1850_START_VALUE};
    ///
    /// let crc = Crc8J1850::new();
    /// let head = crc.checksum(b"1234", J1850_START_VALUE, true);
    /// let full = crc.checksum(b"56789", head, false);
    /// assert_eq!(full, crc.checksum(b"123456789", J1850_START_VALUE, true));
    /// assert_eq!(full, 0x4B);
    /// ```
    pub fn checksum(&self, data: &[u8], start_value: u8, is_first_call: bool) -> u8 {
        let table = self.table.as_array();
        let mut register = if is_first_call {
            start_value
        } else {
            start_value ^ J1850_ALGO.xorout
        };
        for &byte in data {
            register = table[(register ^ byte) as usize];
        }
        register ^ J1850_ALGO.xorout
    }

    /// Chain [`Self::checksum`] over several non-contiguous segments.
    pub fn checksum_segments(&self, segments: &[&[u8]], start_value: u8, is_first_call: bool) -> u8 {
        let mut segments = segments.iter();
        let mut crc = match segments.next() {
            Some(first) => self.checksum(first, start_value, is_first_call),
            None => return self.checksum(&[], start_value, is_first_call),
        };
        for segment in segments {
            crc = self.checksum(segment, crc, false);
        }
        crc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crc::Crc;

    #[test]
    fn test_table_known_entries() {
        let table = Crc8Table::generate();
        let table = table.as_array();
        assert_eq!(table.len(), 256);
        assert_eq!(table[0x00], 0x00);
        assert_eq!(table[0x01], 0x1D);
        assert_eq!(table[0x02], 0x3A);
        assert_eq!(table[0x80], 0x26);
        assert_eq!(table[0xFF], 0xC4);
    }

    #[test]
    fn test_table_generation_is_idempotent() {
        assert_eq!(Crc8Table::generate(), Crc8Table::generate());
        assert_eq!(*j1850_table(), Crc8Table::generate());
        assert!(Arc::ptr_eq(&j1850_table(), &j1850_table()));
    }

    #[test]
    fn test_check_value() {
        let crc = Crc8J1850::new();
        assert_eq!(crc.checksum(b"123456789", J1850_START_VALUE, true), J1850_ALGO.check);
    }

    #[test]
    fn test_matches_crc_crate() {
        let reference = Crc::<u8>::new(&CRC_8_SAE_J1850);
        let crc = Crc8J1850::new();
        let inputs: [&[u8]; 4] = [&[], &[0x00], &[0x23, 0x01, 0x00], &[0xFF; 17]];
        for input in inputs {
            assert_eq!(crc.checksum(input, J1850_START_VALUE, true), reference.checksum(input));
        }
    }

    #[test]
    fn test_chained_equals_contiguous() {
        let crc = Crc8J1850::new();
        let data: Vec<u8> = (0u8..40).map(|b| b.wrapping_mul(37)).collect();
        let whole = crc.checksum(&data, J1850_START_VALUE, true);
        for split in 0..=data.len() {
            let (a, b) = data.split_at(split);
            let head = crc.checksum(a, J1850_START_VALUE, true);
            assert_eq!(crc.checksum(b, head, false), whole, "split at {}", split);
        }
    }

    #[test]
    fn test_checksum_segments() {
        let crc = Crc8J1850::new();
        let chained = crc.checksum_segments(
            &[&b"12"[..], &b""[..], &b"3456"[..], &b"789"[..]],
            J1850_START_VALUE,
            true,
        );
        assert_eq!(chained, 0x4B);
        assert_eq!(
            crc.checksum_segments(&[], J1850_START_VALUE, true),
            crc.checksum(&[], J1850_START_VALUE, true)
        );
    }

    #[test]
    fn test_injected_table() {
        let crc = Crc8J1850::with_table(Arc::new(Crc8Table::generate()));
        assert_eq!(crc.table(), Crc8J1850::new().table());
        assert_eq!(crc.checksum(b"123456789", J1850_START_VALUE, true), 0x4B);
    }
}
