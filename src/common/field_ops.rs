//! Sub-byte field packing.
//!
//! Bit offsets address the frame as a flat bit array: `offset / 8` selects the
//! byte and `offset % 8` the shift from that byte's least significant bit.

const NIBBLE_MASK: u8 = 0x0F;
const BITS_PER_BYTE: u32 = 8;

/// Byte index holding the field that starts at `bit_offset`.
pub fn byte_index(bit_offset: u32) -> usize {
    (bit_offset / BITS_PER_BYTE) as usize
}

/// Shift of the field inside its byte.
pub fn bit_shift(bit_offset: u32) -> u8 {
    (bit_offset % BITS_PER_BYTE) as u8
}

/// Clear the 4-bit slot at `shift` and OR `value` into it.
///
/// Bits of the slot that would land above bit 7 are dropped, the rest of the
/// byte is preserved.
pub fn write_nibble(byte: u8, shift: u8, value: u8) -> u8 {
    let mask = !(NIBBLE_MASK << shift);
    (byte & mask) | ((value & NIBBLE_MASK) << shift)
}

pub fn read_nibble(byte: u8, shift: u8) -> u8 {
    (byte >> shift) & NIBBLE_MASK
}

/// Write a nibble into `frame` at a bit offset. The offset must address a byte
/// inside the frame.
pub fn write_nibble_at(frame: &mut [u8], bit_offset: u32, value: u8) {
    let idx = byte_index(bit_offset);
    frame[idx] = write_nibble(frame[idx], bit_shift(bit_offset), value);
}

pub fn read_nibble_at(frame: &[u8], bit_offset: u32) -> u8 {
    read_nibble(frame[byte_index(bit_offset)], bit_shift(bit_offset))
}

/// Unpack a 64-bit integer into 8 bytes, least significant byte first.
pub fn frame_from_u64(frame: u64) -> [u8; 8] {
    frame.to_le_bytes()
}

/// Repack 8 bytes into a 64-bit integer. Returns `None` unless exactly 8 bytes
/// are given.
pub fn frame_to_u64(frame: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = frame.try_into().ok()?;
    Some(u64::from_le_bytes(bytes))
}
