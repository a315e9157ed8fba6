//! Location derivation and the "u"-prefixed url-safe base64 string form.

use crate::error::{HoloHashError, HoloHashResult};
use crate::{HashType, HoloHash, HOLO_HASH_LOC_LEN};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

impl<T: HashType> std::fmt::Display for HoloHash<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&holo_hash_encode(self.get_raw_39()))
    }
}

impl<T: HashType> std::str::FromStr for HoloHash<T> {
    type Err = HoloHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HoloHash::from_raw_39(holo_hash_decode(s)?)
    }
}

/// Encode raw hash bytes into the "u" prefixed url-safe base64 form.
pub fn holo_hash_encode(data: &[u8]) -> String {
    format!("u{}", URL_SAFE_NO_PAD.encode(data))
}

/// Decode the "u" prefixed string form into raw bytes, without checking
/// the prefix or location.
pub fn holo_hash_decode(s: &str) -> HoloHashResult<Vec<u8>> {
    let rest = s.strip_prefix('u').ok_or(HoloHashError::NoU)?;
    URL_SAFE_NO_PAD
        .decode(rest)
        .map_err(|_| HoloHashError::BadBase64)
}

/// Get the 4 byte DHT location of 32 core bytes:
/// a 16 byte blake2b hash, xor-folded down to 4 bytes.
pub fn holo_dht_location_bytes(data: &[u8]) -> [u8; HOLO_HASH_LOC_LEN] {
    let hash = blake2b_128(data);
    let mut out = [hash[0], hash[1], hash[2], hash[3]];
    for i in (4..16).step_by(4) {
        out[0] ^= hash[i];
        out[1] ^= hash[i + 1];
        out[2] ^= hash[i + 2];
        out[3] ^= hash[i + 3];
    }
    out
}

/// internal compute a 16 byte blake2b hash
pub fn blake2b_128(data: &[u8]) -> Vec<u8> {
    let hash = blake2b_simd::Params::new().hash_length(16).hash(data);
    hash.as_bytes().to_vec()
}
