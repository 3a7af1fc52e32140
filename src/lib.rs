//! # E2E Profile 11 Protection Library
//!
//! End-to-end protection of fixed-layout frames in the style of AUTOSAR
//! E2E Profile 11.
//!
//! ## Overview
//!
//! Each protected frame carries:
//! - an 8-bit SAE J1850 CRC (data corruption)
//! - a 4-bit sequence counter (loss, repetition, reordering)
//! - optionally the high nibble of a 12-bit Data ID (incorrect addressing)
//!
//! ## Example
//!
//! ```rust
//! use e2e_p11::{E2EProfile, E2EResult, E2EStatus};
//! use e2e_p11::profile11::{Profile11, Profile11Config, Profile11IdMode};
//!
//! # fn main() -> E2EResult<()> {
//! let config = Profile11Config {
//!     mode: Profile11IdMode::Both,
//!     data_id: 0x123,
//!     max_delta_counter: 3,
//!     ..Default::default()
//! };
//!
//! let mut sender = Profile11::new(config.clone())?;
//! let mut receiver = Profile11::new(config)?;
//!
//! // [CRC, counter, user data ..]
//! let frame = sender.protect(&[0x00; 8])?;
//! assert_eq!(frame[0], 0xCC);
//!
//! assert_eq!(receiver.check(&frame), E2EStatus::Ok);
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

mod common;
mod profiles;
pub use common::crc_ops;
pub use common::field_ops;
pub use profiles::profile11;

/// Result type for E2E operations
pub type E2EResult<T> = Result<T, E2EError>;

/// E2E check status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum E2EStatus {
    /// No frame was available in this cycle
    NoNewData,
    /// CRC or Data ID mismatch, or counter gap beyond the allowed delta
    Error,
    /// Counter sequence violation under a stricter gap policy
    WrongSequence,
    /// Frame length does not match the configured data length
    WrongInput,
    /// Same counter as the last accepted frame
    Repeated,
    /// Counter increased within the allowed delta, some frames were lost
    OkSomeLost,
    /// The checks of data in this cycle are successful
    Ok,
}

impl E2EStatus {
    /// `true` when the frame content can be used.
    pub fn is_ok(self) -> bool {
        matches!(self, E2EStatus::Ok | E2EStatus::OkSomeLost)
    }
}

/// E2E Error types
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum E2EError {
    /// Invalid configuration provided
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidDataFormat(String),
}

/// Common interface of an E2E protection profile.
///
/// - `protect`: add E2E protection to a frame
/// - `check`: verify E2E protection on a received frame
pub trait E2EProfile {
    /// Configuration type for this profile
    type Config;

    /// Create a new instance with the given configuration
    ///
    /// # Errors
    /// Returns `E2EError::InvalidConfiguration` if the configuration is invalid
    fn new(config: Self::Config) -> E2EResult<Self>
    where
        Self: Sized;

    /// Return a protected copy of `data`.
    ///
    /// The copy gets the sequence counter, the Data ID (if applicable) and
    /// the CRC written into their configured positions. `data` itself is left
    /// untouched.
    ///
    /// # Errors
    /// Returns `E2EError::InvalidDataFormat` if `data` has the wrong length
    fn protect(&mut self, data: &[u8]) -> E2EResult<Vec<u8>>;

    /// Check E2E protection on received data
    ///
    /// Corrupted, stale or repeated frames are ordinary outcomes and are
    /// reported through the returned status.
    fn check(&mut self, data: &[u8]) -> E2EStatus;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_e2e_status() {
        assert_eq!(E2EStatus::Ok, E2EStatus::Ok);
        assert_ne!(E2EStatus::Ok, E2EStatus::Error);
        assert!(E2EStatus::OkSomeLost.is_ok());
        assert!(!E2EStatus::Repeated.is_ok());
        assert!(!E2EStatus::WrongInput.is_ok());
    }

    #[test]
    fn test_error_display() {
        let err = E2EError::InvalidDataFormat("Expected 8 bytes, got 7 bytes".into());
        assert_eq!(err.to_string(), "Invalid data format: Expected 8 bytes, got 7 bytes");
    }
}
