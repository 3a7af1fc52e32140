//! # E2E Profile 11 Implementation
//!
//! Profile 11 protects small fixed-length frames with low overhead. It uses:
//! - 8-bit CRC (SAE J1850) for data integrity
//! - 4-bit counter for sequence checking (0-15)
//! - 4-bit Data ID nibble for addressing verification
//!
//! # Data layout
//! [DATA ... | CRC(1B) | HDR(1B) | DATA ...]
//! - HDR (bits 7..4) : DI_hi_nibble(nibble mode) OR data(both mode)
//! - HDR (bits 3..0) : counter
//!
//! All three fields sit at configurable bit offsets. The layout above is the
//! default one (CRC at bit 0, counter at bit 8, nibble at bit 12).
//!
//! # Modes
//!
//! - **Both**: the Data ID is implicit, both of its bytes only enter the CRC.
//! - **Nibble**: bits 8..11 of the Data ID are explicit in the frame, the low
//!   byte is implicit (in CRC) followed by a zero byte.

use crate::common::counter::{
    classify_delta, counter_delta, decrement_counter, increment_counter, MAX_DELTA_COUNTER,
};
use crate::common::crc_ops::{Crc8J1850, J1850_ALGO, J1850_START_VALUE};
use crate::common::field_ops::{
    bit_shift, byte_index, frame_from_u64, frame_to_u64, read_nibble, read_nibble_at, write_nibble,
    write_nibble_at,
};
use crate::common::validation::{
    byte_bits, nibble_bits, validate_byte_aligned, validate_data_length_bits,
    validate_data_length_exact, validate_max_value, validate_nibble_fits_byte,
    validate_no_overlap, validate_offset_within_data,
};
use crate::{E2EError, E2EProfile, E2EResult, E2EStatus};
use tracing::{debug, warn};

// Constants
const NIBBLE_MASK: u16 = 0x0F;
const DATA_ID_MAX: u16 = 0x0FFF;
const BITS_PER_BYTE: u32 = 8;
const U64_FRAME_BITS: u32 = 64;

/// Data-ID mode for Profile 11.
///
/// # Variants
///
/// * `Both` - The complete Data ID is only used implicitly for CRC
///   calculation, low byte first. The frame keeps whatever the caller put
///   next to the counter.
///
/// * `Nibble` - Bits 8..11 of the Data ID are stored explicitly in the frame,
///   while the low byte is used implicitly for CRC calculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile11IdMode {
    Both,
    Nibble,
}

/// Configuration for E2E Profile 11
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile11Config {
    /// A unique identifier, only the lower 12 bits are allowed
    pub data_id: u16,
    /// Frame length in bits, a multiple of 8
    pub data_length: u32,
    /// Profile mode
    pub mode: Profile11IdMode,
    /// Bit offset of the counter nibble
    pub counter_offset: u32,
    /// Bit offset of the CRC byte, a multiple of 8
    pub crc_offset: u32,
    /// Bit offset of the low nibble of the high byte of Data ID
    pub nibble_offset: u32,
    /// Maximum allowed delta between consecutive counters
    pub max_delta_counter: u8,
}

impl Default for Profile11Config {
    fn default() -> Self {
        Self {
            data_id: 0x123,
            data_length: 64, // bits
            mode: Profile11IdMode::Nibble,
            counter_offset: 8, // bits
            crc_offset: 0,     // bits
            nibble_offset: 12, // bits
            max_delta_counter: 1,
        }
    }
}

struct Profile11Check {
    rx_counter: u8,
    rx_crc: u8,
    rx_nibble: Option<u8>,
    calculated_crc: u8,
}

/// E2E Profile 11 Implementation
///
/// Owns one 4-bit counter: the value written by the next `protect` and the
/// value the next `check` expects. One instance per communication channel.
#[derive(Clone, Debug)]
pub struct Profile11 {
    config: Profile11Config,
    counter: u8,
    crc: Crc8J1850,
}

impl Profile11 {
    /// Create an instance computing its CRC with `crc` instead of the
    /// process-wide J1850 table.
    pub fn with_crc(config: Profile11Config, crc: Crc8J1850) -> E2EResult<Self> {
        Self::validate_config(&config)?;
        Ok(Self {
            config,
            counter: 0,
            crc,
        })
    }

    pub fn config(&self) -> &Profile11Config {
        &self.config
    }

    /// Counter value the next frame will carry.
    ///
    /// A new instance starts at 0, so the first received frame is classified
    /// against a previous counter of 15: counter 0 gives `Ok`, 15 gives
    /// `Repeated` and 1..=max_delta_counter gives `OkSomeLost`.
    pub fn counter(&self) -> u8 {
        self.counter
    }

    /// Validate configuration parameters
    fn validate_config(config: &Profile11Config) -> E2EResult<()> {
        validate_data_length_bits(config.data_length)?;
        validate_max_value("Data ID", config.data_id, DATA_ID_MAX)?;
        validate_max_value("Max delta counter", config.max_delta_counter, MAX_DELTA_COUNTER)?;

        validate_byte_aligned("Crc", config.crc_offset)?;
        validate_offset_within_data("Crc", config.crc_offset, config.data_length)?;

        validate_nibble_fits_byte("Counter", config.counter_offset)?;
        validate_offset_within_data("Counter", config.counter_offset, config.data_length)?;
        validate_no_overlap(
            ("Counter", nibble_bits(config.counter_offset)),
            ("Crc", byte_bits(config.crc_offset)),
        )?;

        if config.mode == Profile11IdMode::Nibble {
            validate_offset_within_data("Nibble", config.nibble_offset, config.data_length)?;
            validate_no_overlap(
                ("Nibble", nibble_bits(config.nibble_offset)),
                ("Crc", byte_bits(config.crc_offset)),
            )?;
            validate_no_overlap(
                ("Nibble", nibble_bits(config.nibble_offset)),
                ("Counter", nibble_bits(config.counter_offset)),
            )?;
        }

        Ok(())
    }

    fn frame_len(&self) -> usize {
        (self.config.data_length / BITS_PER_BYTE) as usize
    }

    fn validate_length(&self, len: usize) -> E2EResult<()> {
        validate_data_length_exact(len, self.frame_len())
    }

    fn crc_index(&self) -> usize {
        byte_index(self.config.crc_offset)
    }

    fn data_id_nibble(&self) -> u8 {
        ((self.config.data_id >> BITS_PER_BYTE) & NIBBLE_MASK) as u8
    }

    /// Data ID nibble as it reads back from the frame. A nibble placed above
    /// bit 4 of its byte loses its upper bits.
    fn expected_nibble(&self) -> u8 {
        let shift = bit_shift(self.config.nibble_offset);
        read_nibble(write_nibble(0x00, shift, self.data_id_nibble()), shift)
    }

    /// Data ID bytes entering the CRC ahead of the frame
    fn data_id_bytes(&self) -> [u8; 2] {
        let [low, high] = self.config.data_id.to_le_bytes();
        match self.config.mode {
            Profile11IdMode::Both => [low, high],
            Profile11IdMode::Nibble => [low, 0x00],
        }
    }

    /// CRC over the Data ID bytes and every frame byte but the CRC byte.
    fn compute_crc(&self, data: &[u8]) -> u8 {
        let [low, high] = self.data_id_bytes();
        let crc_idx = self.crc_index();

        let crc = self.crc.checksum_segments(
            &[&[low][..], &[high][..], &data[..crc_idx], &data[crc_idx + 1..]],
            J1850_START_VALUE,
            false,
        );
        crc ^ J1850_ALGO.xorout
    }

    fn read_check_items(&self, data: &[u8]) -> Profile11Check {
        Profile11Check {
            rx_counter: read_nibble_at(data, self.config.counter_offset),
            rx_crc: data[self.crc_index()],
            rx_nibble: match self.config.mode {
                Profile11IdMode::Nibble => Some(read_nibble_at(data, self.config.nibble_offset)),
                Profile11IdMode::Both => None,
            },
            calculated_crc: self.compute_crc(data),
        }
    }

    fn do_checks(&mut self, check_items: Profile11Check) -> E2EStatus {
        if check_items.calculated_crc != check_items.rx_crc {
            warn!(
                rx_crc = check_items.rx_crc,
                calculated_crc = check_items.calculated_crc,
                "Profile 11 CRC mismatch"
            );
            return E2EStatus::Error;
        }
        if let Some(rx_nibble) = check_items.rx_nibble {
            if rx_nibble != self.expected_nibble() {
                warn!(
                    rx_nibble,
                    expected_nibble = self.expected_nibble(),
                    "Profile 11 Data ID mismatch"
                );
                return E2EStatus::Error;
            }
        }

        let last_counter = decrement_counter(self.counter);
        let delta = counter_delta(last_counter, check_items.rx_counter);
        let status = classify_delta(delta, self.config.max_delta_counter);
        if status == E2EStatus::Error {
            warn!(
                rx_counter = check_items.rx_counter,
                last_counter,
                delta,
                "Profile 11 counter gap exceeds max delta"
            );
        }
        // Follow the sender, even across a gap that was too large
        self.counter = increment_counter(check_items.rx_counter);
        status
    }

    /// Protect a 64-bit frame packed little-endian (byte 0 = least
    /// significant byte).
    ///
    /// # Errors
    /// Returns `E2EError::InvalidDataFormat` unless the data length is 64 bits
    pub fn protect_u64(&mut self, frame: u64) -> E2EResult<u64> {
        if self.config.data_length != U64_FRAME_BITS {
            return Err(E2EError::InvalidDataFormat(format!(
                "Data length must be {} bits for u64 frames, configured {} bits",
                U64_FRAME_BITS, self.config.data_length
            )));
        }
        let protected = self.protect(&frame_from_u64(frame))?;
        frame_to_u64(&protected).ok_or_else(|| {
            E2EError::InvalidDataFormat(format!(
                "Expected 8 bytes, got {} bytes",
                protected.len()
            ))
        })
    }

    /// Check a 64-bit frame packed like [`Self::protect_u64`] output.
    pub fn check_u64(&mut self, frame: u64) -> E2EStatus {
        if self.config.data_length != U64_FRAME_BITS {
            warn!(
                data_length = self.config.data_length,
                "Profile 11 u64 check needs a 64 bit data length"
            );
            return E2EStatus::WrongInput;
        }
        self.check(&frame_from_u64(frame))
    }
}

impl E2EProfile for Profile11 {
    type Config = Profile11Config;

    fn new(config: Self::Config) -> E2EResult<Self> {
        Self::with_crc(config, Crc8J1850::new())
    }

    fn protect(&mut self, data: &[u8]) -> E2EResult<Vec<u8>> {
        self.validate_length(data.len())?;
        let mut protected = data.to_vec();
        if self.config.mode == Profile11IdMode::Nibble {
            write_nibble_at(&mut protected, self.config.nibble_offset, self.data_id_nibble());
        }
        write_nibble_at(&mut protected, self.config.counter_offset, self.counter);
        let crc_idx = self.crc_index();
        protected[crc_idx] = self.compute_crc(&protected);
        self.counter = increment_counter(self.counter);
        Ok(protected)
    }

    fn check(&mut self, data: &[u8]) -> E2EStatus {
        if let Err(err) = self.validate_length(data.len()) {
            warn!(%err, "Profile 11 check rejected frame");
            return E2EStatus::WrongInput;
        }
        let check_items = self.read_check_items(data);
        let rx_counter = check_items.rx_counter;
        let status = self.do_checks(check_items);
        debug!(rx_counter, counter = self.counter, ?status, "Profile 11 check");
        status
    }
}
