//! HoloHash Error Type.

use crate::HOLO_HASH_RAW_LEN;

/// HoloHash Error Type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HoloHashError {
    /// The byte sequence was not the expected length.
    #[error("invalid holo_hash byte count, expected: {expected}, found: {found}")]
    BadSize {
        /// the byte count we wanted
        expected: usize,
        /// the byte count we got
        found: usize,
    },

    /// The 3 prefix bytes did not match the expected hash type.
    #[error("holo_hash {0} has bad prefix: {1:?}")]
    BadPrefix(String, [u8; 3]),

    /// The 4 location bytes did not match the core bytes.
    #[error("holo_hash has bad location bytes, expected {expected:?}, found {found:?}")]
    BadChecksum {
        /// location derived from the core bytes
        expected: [u8; 4],
        /// location carried in the hash
        found: [u8; 4],
    },

    /// The string form of a hash did not start with "u".
    #[error("holo_hash string must start with 'u'")]
    NoU,

    /// The string form of a hash was not valid base64.
    #[error("holo_hash string is not valid url-safe base64")]
    BadBase64,
}

impl HoloHashError {
    pub(crate) fn bad_raw_size(found: usize) -> Self {
        Self::BadSize {
            expected: HOLO_HASH_RAW_LEN,
            found,
        }
    }
}

/// HoloHash Result type
pub type HoloHashResult<T> = Result<T, HoloHashError>;
