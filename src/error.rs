//! Error types for the parking store and its cache.

use thiserror::Error;

/// Longest slot number accepted by `add_slot`.
pub const MAX_SLOT_NO_LEN: usize = 6;

/// Rejection reasons for a new slot number.
///
/// The `Display` text is the message shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Slot number cannot be empty.")]
    EmptySlotNo,

    #[error("Slot \"{0}\" is longer than {max} characters.", max = MAX_SLOT_NO_LEN)]
    SlotNoTooLong(String),

    #[error("Slot \"{0}\" already exists.")]
    DuplicateSlotNo(String),
}

/// Errors raised by a key-value cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Cache is locked by another process")]
    Locked,

    #[error("Invalid cache key: {0:?}")]
    InvalidKey(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_data() || e.is_syntax() || e.is_eof() {
            CacheError::Deserialization(e.to_string())
        } else {
            CacheError::Serialization(e.to_string())
        }
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
