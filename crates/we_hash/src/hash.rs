use crate::encode::holo_dht_location_bytes;
use crate::error::{HoloHashError, HoloHashResult};
use crate::{HashType, PrimitiveHashType};

/// Length of the prefix bytes (3)
pub const HOLO_HASH_PREFIX_LEN: usize = 3;

/// Length of the core bytes (32)
pub const HOLO_HASH_CORE_LEN: usize = 32;

/// Length of the location bytes (4)
pub const HOLO_HASH_LOC_LEN: usize = 4;

/// Length of the core bytes + the loc bytes (36 = 32 + 4)
pub const HOLO_HASH_UNTYPED_LEN: usize = HOLO_HASH_CORE_LEN + HOLO_HASH_LOC_LEN; // 36

/// Length of the full HoloHash bytes (39 = 3 + 32 + 4)
pub const HOLO_HASH_RAW_LEN: usize = HOLO_HASH_PREFIX_LEN + HOLO_HASH_CORE_LEN + HOLO_HASH_LOC_LEN;

/// A HoloHash contains a vector of 39 bytes: a 3-byte type prefix, the
/// 32-byte core and 4 bytes of DHT location. It also contains a zero-sized
/// type which specifies what it is a hash of.
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct HoloHash<T: HashType> {
    hash: Vec<u8>,
    hash_type: T,
}

impl<T: HashType> HoloHash<T> {
    /// Construct from the full 39 bytes, checking the size, the prefix and
    /// that the location bytes belong to the core.
    pub fn from_raw_39(hash: Vec<u8>) -> HoloHashResult<Self> {
        if hash.len() != HOLO_HASH_RAW_LEN {
            return Err(HoloHashError::bad_raw_size(hash.len()));
        }
        let hash_type = T::try_from_prefix(&hash[..HOLO_HASH_PREFIX_LEN])?;
        let expected = holo_dht_location_bytes(
            &hash[HOLO_HASH_PREFIX_LEN..HOLO_HASH_PREFIX_LEN + HOLO_HASH_CORE_LEN],
        );
        let mut found = [0; HOLO_HASH_LOC_LEN];
        found.copy_from_slice(&hash[HOLO_HASH_RAW_LEN - HOLO_HASH_LOC_LEN..]);
        if expected != found {
            return Err(HoloHashError::BadChecksum { expected, found });
        }
        Ok(Self { hash, hash_type })
    }

    /// Construct from 32 core bytes and a hash type, computing the location.
    pub fn from_raw_32_and_type(core: Vec<u8>, hash_type: T) -> HoloHashResult<Self> {
        if core.len() != HOLO_HASH_CORE_LEN {
            return Err(HoloHashError::BadSize {
                expected: HOLO_HASH_CORE_LEN,
                found: core.len(),
            });
        }
        let loc = holo_dht_location_bytes(&core);
        let mut hash = Vec::with_capacity(HOLO_HASH_RAW_LEN);
        hash.extend_from_slice(hash_type.get_prefix());
        hash.extend_from_slice(&core);
        hash.extend_from_slice(&loc);
        Ok(Self { hash, hash_type })
    }

    /// The HashType of this hash
    pub fn hash_type(&self) -> &T {
        &self.hash_type
    }

    /// Get the raw 39-byte Vec including the 3 byte prefix, base 32 bytes, and the 4 byte loc
    pub fn get_raw_39(&self) -> &[u8] {
        &self.hash[..]
    }

    /// Get 36-byte Vec which excludes the 3 byte prefix
    pub fn get_raw_36(&self) -> &[u8] {
        &self.hash[HOLO_HASH_PREFIX_LEN..]
    }

    /// Fetch just the core 32 bytes (without the 4 location bytes)
    pub fn get_raw_32(&self) -> &[u8] {
        &self.hash[HOLO_HASH_PREFIX_LEN..HOLO_HASH_PREFIX_LEN + HOLO_HASH_CORE_LEN]
    }

    /// The core 32 bytes as a fixed size array.
    pub fn get_raw_32_array(&self) -> [u8; HOLO_HASH_CORE_LEN] {
        let mut out = [0; HOLO_HASH_CORE_LEN];
        out.copy_from_slice(self.get_raw_32());
        out
    }

    /// Fetch the holo dht location for this hash
    pub fn get_loc(&self) -> u32 {
        bytes_to_loc(&self.hash[HOLO_HASH_RAW_LEN - HOLO_HASH_LOC_LEN..])
    }

    /// consume into the inner byte vector
    pub fn into_inner(self) -> Vec<u8> {
        self.hash
    }
}

impl<P: PrimitiveHashType> HoloHash<P> {
    /// Construct from 32 core bytes, using the known PrimitiveHashType.
    ///
    /// Panics if the input is not 32 bytes long, use
    /// [`HoloHash::from_raw_32_and_type`] for a fallible version.
    pub fn from_raw_32(core: Vec<u8>) -> Self {
        match Self::from_raw_32_and_type(core, P::new()) {
            Ok(hash) => hash,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: HashType> AsRef<[u8]> for HoloHash<T> {
    fn as_ref(&self) -> &[u8] {
        &self.hash
    }
}

// NB: See encode module for Display impl
impl<T: HashType> std::fmt::Debug for HoloHash<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}({})", self.hash_type().hash_name(), self))
    }
}

/// internal convert 4 location bytes into a u32 location
fn bytes_to_loc(bytes: &[u8]) -> u32 {
    (bytes[0] as u32)
        + ((bytes[1] as u32) << 8)
        + ((bytes[2] as u32) << 16)
        + ((bytes[3] as u32) << 24)
}
