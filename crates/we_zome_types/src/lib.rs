//! Types for addressing, authorizing and signing zome calls.
//!
//! The one piece of real logic here is [`ZomeCallUnsigned::canonical_bytes`]:
//! signer and verifier must agree on it byte for byte.

#![deny(missing_docs)]

#[doc(hidden)]
pub use paste;
#[doc(hidden)]
pub use serde;
#[doc(hidden)]
pub use subtle;

mod capability;
mod cell;
mod error;
mod nonce;
mod secure_primitive;
mod signature;
mod timestamp;
mod zome_call;

pub use capability::*;
pub use cell::*;
pub use error::*;
pub use nonce::*;
pub use secure_primitive::SecurePrimitiveError;
pub use signature::*;
pub use timestamp::*;
pub use zome_call::*;

/// Common imports
pub mod prelude {
    pub use crate::*;
    pub use we_hash::{AgentPubKey, DnaHash};
}
