//! Type aliases for the concrete HoloHash types

use crate::hash_type;
use crate::HoloHash;

/// An Agent public signing key. Not really a hash, more of an "identity hash".
pub type AgentPubKey = HoloHash<hash_type::Agent>;

/// The hash of a DnaDef
pub type DnaHash = HoloHash<hash_type::Dna>;
