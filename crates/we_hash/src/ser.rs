use crate::{HashType, HoloHash};
use serde::de::Error;

// A HoloHash serializes as its raw 39 bytes, and is fully checked on the
// way back in.
impl<T: HashType> serde::Serialize for HoloHash<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(self.get_raw_39())
    }
}

impl<'de, T: HashType> serde::Deserialize<'de> for HoloHash<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes: serde_bytes::ByteBuf = serde::Deserialize::deserialize(deserializer)?;
        HoloHash::from_raw_39(bytes.into_vec()).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn msgpack_is_raw_bin_39() {
        let dna = DnaHash::from_raw_32(vec![9; 32]);
        let bytes = rmp_serde::to_vec(&dna).unwrap();
        // bin8 marker, length, then the raw hash
        assert_eq!(&[0xc4, 39][..], &bytes[..2]);
        assert_eq!(dna.get_raw_39(), &bytes[2..]);

        let back: DnaHash = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(dna, back);
    }
}
