//! Defines HoloHash and the hash types needed to address a cell.
//!
//! A HoloHash is 39 bytes: a 3 byte type prefix, the 32 "core" bytes
//! (a blake2b hash, or an ed25519 public key for agents) and 4 bytes of
//! DHT location derived from the core.
//!
//! # Example
//!
//! ```
//! use we_hash::*;
//!
//! let agent = AgentPubKey::from_raw_32(vec![0xdb; 32]);
//! assert_eq!(39, agent.get_raw_39().len());
//! assert_eq!(&[0xdb; 32][..], agent.get_raw_32());
//!
//! let parsed = AgentPubKey::from_raw_39(agent.get_raw_39().to_vec()).unwrap();
//! assert_eq!(agent, parsed);
//! ```

#![deny(missing_docs)]

mod aliases;
pub mod encode;
pub mod error;
mod hash;
pub mod hash_type;
mod ser;

pub use aliases::*;
pub use encode::{holo_hash_decode, holo_hash_encode};
pub use error::{HoloHashError, HoloHashResult};
pub use hash::*;
pub use hash_type::HashType;
pub use hash_type::PrimitiveHashType;
