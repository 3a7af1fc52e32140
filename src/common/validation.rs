use crate::common::field_ops::{bit_shift, byte_index};
use crate::{E2EError, E2EResult};
use std::fmt::Display;
use std::ops::Range;

const BITS_PER_BYTE: u32 = 8;
const BITS_PER_NIBBLE: u32 = 4;

pub fn validate_data_length_exact<T>(len: T, expected: T) -> E2EResult<()>
where
    T: PartialEq + Display,
{
    if len != expected {
        return Err(E2EError::InvalidDataFormat(format!(
            "Expected {} bytes, got {} bytes",
            expected, len
        )));
    }
    Ok(())
}

pub fn validate_data_length_bits(data_length: u32) -> E2EResult<()> {
    if data_length == 0 || data_length % BITS_PER_BYTE != 0 {
        return Err(E2EError::InvalidConfiguration(
            "Data length shall be a non-zero multiple of 8".into(),
        ));
    }
    Ok(())
}

pub fn validate_max_value<T>(name: &str, value: T, max: T) -> E2EResult<()>
where
    T: PartialOrd + Display,
{
    if value > max {
        return Err(E2EError::InvalidConfiguration(format!(
            "{} must be between 0 and {}, got {}",
            name, max, value
        )));
    }
    Ok(())
}

/// The byte addressed by `bit_offset` must lie inside a frame of
/// `data_length` bits.
pub fn validate_offset_within_data(name: &str, bit_offset: u32, data_length: u32) -> E2EResult<()> {
    if byte_index(bit_offset) >= byte_index(data_length) {
        return Err(E2EError::InvalidConfiguration(format!(
            "{} offset {} exceeds frame of {} bits",
            name, bit_offset, data_length
        )));
    }
    Ok(())
}

pub fn validate_byte_aligned(name: &str, bit_offset: u32) -> E2EResult<()> {
    if bit_offset % BITS_PER_BYTE != 0 {
        return Err(E2EError::InvalidConfiguration(format!(
            "{} offset shall be a multiple of 8",
            name
        )));
    }
    Ok(())
}

/// A nibble starting at `bit_offset` must not straddle a byte boundary.
pub fn validate_nibble_fits_byte(name: &str, bit_offset: u32) -> E2EResult<()> {
    if u32::from(bit_shift(bit_offset)) > BITS_PER_BYTE - BITS_PER_NIBBLE {
        return Err(E2EError::InvalidConfiguration(format!(
            "{} offset bit index within byte must be 0-4",
            name
        )));
    }
    Ok(())
}

/// Bits actually covered by a nibble field, clipped to its byte.
pub fn nibble_bits(bit_offset: u32) -> Range<u32> {
    let byte_end = (bit_offset / BITS_PER_BYTE + 1) * BITS_PER_BYTE;
    bit_offset..(bit_offset + BITS_PER_NIBBLE).min(byte_end)
}

pub fn byte_bits(bit_offset: u32) -> Range<u32> {
    bit_offset..bit_offset + BITS_PER_BYTE
}

pub fn validate_no_overlap(
    (name_a, bits_a): (&str, Range<u32>),
    (name_b, bits_b): (&str, Range<u32>),
) -> E2EResult<()> {
    if bits_a.start < bits_b.end && bits_b.start < bits_a.end {
        return Err(E2EError::InvalidConfiguration(format!(
            "{} field overlaps {} field",
            name_a, name_b
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_length_exact() {
        assert!(validate_data_length_exact(8usize, 8).is_ok());
        assert_eq!(
            validate_data_length_exact(7usize, 8),
            Err(E2EError::InvalidDataFormat("Expected 8 bytes, got 7 bytes".into()))
        );
    }

    #[test]
    fn test_data_length_bits() {
        assert!(validate_data_length_bits(64).is_ok());
        assert!(validate_data_length_bits(0).is_err());
        assert!(validate_data_length_bits(63).is_err());
    }

    #[test]
    fn test_offset_within_data() {
        assert!(validate_offset_within_data("Crc", 56, 64).is_ok());
        assert!(validate_offset_within_data("Crc", 63, 64).is_ok());
        assert!(validate_offset_within_data("Crc", 64, 64).is_err());
    }

    #[test]
    fn test_nibble_fits_byte() {
        assert!(validate_nibble_fits_byte("Counter", 8).is_ok());
        assert!(validate_nibble_fits_byte("Counter", 12).is_ok());
        assert!(validate_nibble_fits_byte("Counter", 13).is_err());
    }

    #[test]
    fn test_overlap() {
        assert!(validate_no_overlap(("Counter", nibble_bits(8)), ("Crc", byte_bits(0))).is_ok());
        assert!(validate_no_overlap(("Counter", nibble_bits(8)), ("Nibble", nibble_bits(12))).is_ok());
        assert!(validate_no_overlap(("Counter", nibble_bits(8)), ("Nibble", nibble_bits(10))).is_err());
        assert!(validate_no_overlap(("Counter", nibble_bits(4)), ("Crc", byte_bits(0))).is_err());
        assert_eq!(nibble_bits(14), 14..16);
    }
}
