//! Defines the prefixes for the various HashTypes, as well as the traits
//! which unify them

use crate::error::{HoloHashError, HoloHashResult};

const AGENT_PREFIX: [u8; 3] = [0x84, 0x20, 0x24]; // uhCAk
const DNA_PREFIX: [u8; 3] = [0x84, 0x2d, 0x24]; // uhC0k

/// Every HoloHash is generic over HashType.
pub trait HashType:
    Copy
    + Clone
    + std::fmt::Debug
    + std::hash::Hash
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Send
    + Sync
    + 'static
{
    /// Get the 3 byte prefix for the underlying primitive hash type
    fn get_prefix(self) -> &'static [u8; 3];

    /// Given a 3-byte prefix, return the HashType, or an error if the prefix
    /// does not belong to this type
    fn try_from_prefix(prefix: &[u8]) -> HoloHashResult<Self>;

    /// Get a Display-worthy name for this hash type
    fn hash_name(self) -> &'static str;
}

/// A PrimitiveHashType is one with a single, static prefix
pub trait PrimitiveHashType: HashType {
    /// Constructor
    fn new() -> Self;

    /// Get the 3 byte prefix, which is statically known for primitive hash types
    fn static_prefix() -> &'static [u8; 3];
}

macro_rules! primitive_hash_type {
    ($name:ident, $display:ident, $prefix:ident) => {
        /// The
        #[doc = stringify!($display)]
        /// PrimitiveHashType
        #[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $name;

        impl PrimitiveHashType for $name {
            fn new() -> Self {
                Self
            }

            fn static_prefix() -> &'static [u8; 3] {
                &$prefix
            }
        }

        impl HashType for $name {
            fn get_prefix(self) -> &'static [u8; 3] {
                &$prefix
            }

            fn try_from_prefix(prefix: &[u8]) -> HoloHashResult<Self> {
                if prefix == $prefix {
                    Ok($name)
                } else {
                    let mut found = [0; 3];
                    let len = prefix.len().min(3);
                    found[..len].copy_from_slice(&prefix[..len]);
                    Err(HoloHashError::BadPrefix(
                        stringify!($display).to_string(),
                        found,
                    ))
                }
            }

            fn hash_name(self) -> &'static str {
                stringify!($display)
            }
        }
    };
}

primitive_hash_type!(Agent, AgentPubKey, AGENT_PREFIX);
primitive_hash_type!(Dna, DnaHash, DNA_PREFIX);
