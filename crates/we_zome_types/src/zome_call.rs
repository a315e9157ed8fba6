//! Data needed to make zome calls, and the canonical form that gets signed.

use crate::*;
use sha2::{Digest, Sha512};
use std::sync::Arc;
use we_hash::{AgentPubKey, DnaHash};

/// Version byte leading every canonical encoding. Bump this whenever the
/// field set or order of [`ZomeCallUnsigned::canonical_bytes`] changes,
/// signer and verifier must agree on it.
pub const ZOME_CALL_CANONICAL_VERSION: u8 = 1;

/// The name of a zome.
#[derive(
    Debug,
    Clone,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
    derive_more::Display,
    derive_more::From,
)]
pub struct ZomeName(pub String);

impl From<&str> for ZomeName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A single function name.
#[derive(
    Debug,
    Clone,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
    derive_more::Display,
    derive_more::From,
)]
pub struct FunctionName(pub String);

impl From<&str> for FunctionName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque, already serialized input to a zome function.
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ExternIO(#[serde(with = "serde_bytes")] pub Vec<u8>);

impl std::fmt::Debug for ExternIO {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExternIO({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for ExternIO {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl ExternIO {
    /// The payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the payload bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

/// A zome call awaiting authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZomeCallUnsigned {
    /// The cell being called into.
    pub cell_id: CellId,
    /// The zome containing the function.
    pub zome_name: ZomeName,
    /// The function to call.
    pub fn_name: FunctionName,
    /// The capability claimed by the caller.
    pub cap: CallCapability,
    /// The agent making the call; the signature must be made by this key.
    pub provenance: AgentPubKey,
    /// Serialized input to the function.
    pub payload: ExternIO,
    /// Replay protection.
    pub nonce: Nonce256Bits,
    /// The call is invalid after this time, `Timestamp(0)` means never.
    pub expires_at: Timestamp,
}

/// Field order of this struct IS the wire order of the canonical encoding.
/// rmp-serde writes structs as positional arrays, bytes as `bin` and
/// strings as `str`, all length prefixed.
#[derive(serde::Serialize)]
struct CanonicalZomeCall<'a> {
    dna_hash: &'a DnaHash,
    agent_pubkey: &'a AgentPubKey,
    zome_name: &'a str,
    fn_name: &'a str,
    #[serde(with = "serde_bytes")]
    payload: &'a [u8],
    cap_secret: Option<&'a CapSecret>,
    provenance: &'a AgentPubKey,
    nonce: &'a Nonce256Bits,
    expires_at: i64,
}

impl ZomeCallUnsigned {
    /// The deterministic byte form of every field: the version byte followed
    /// by the messagepack array of the fields in fixed order.
    pub fn canonical_bytes(&self) -> ZomeTypesResult<Vec<u8>> {
        let canonical = CanonicalZomeCall {
            dna_hash: self.cell_id.dna_hash(),
            agent_pubkey: self.cell_id.agent_pubkey(),
            zome_name: &self.zome_name.0,
            fn_name: &self.fn_name.0,
            payload: self.payload.as_bytes(),
            cap_secret: self.cap.secret(),
            provenance: &self.provenance,
            nonce: &self.nonce,
            expires_at: self.expires_at.as_micros(),
        };
        let mut out = vec![ZOME_CALL_CANONICAL_VERSION];
        rmp_serde::encode::write(&mut out, &canonical)?;
        Ok(out)
    }

    /// The bytes a signature is made over: the SHA-512 of the canonical bytes.
    pub fn data_to_sign(&self) -> ZomeTypesResult<Arc<[u8]>> {
        let digest = Sha512::digest(self.canonical_bytes()?);
        Ok(digest.to_vec().into())
    }

    /// Whether the call has expired at `now`. Calls with no expiry never do.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at != Timestamp::ZERO && self.expires_at <= now
    }
}

/// A zome call together with the provenance's signature over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZomeCall {
    /// The cell being called into.
    pub cell_id: CellId,
    /// The zome containing the function.
    pub zome_name: ZomeName,
    /// The function to call.
    pub fn_name: FunctionName,
    /// The capability claimed by the caller.
    pub cap: CallCapability,
    /// The agent making the call.
    pub provenance: AgentPubKey,
    /// Serialized input to the function.
    pub payload: ExternIO,
    /// Replay protection.
    pub nonce: Nonce256Bits,
    /// The call is invalid after this time, `Timestamp(0)` means never.
    pub expires_at: Timestamp,
    /// Signature of `provenance` over the unsigned call's `data_to_sign`.
    pub signature: Signature,
}

impl ZomeCall {
    /// Attach a signature to an unsigned call.
    pub fn from_unsigned(unsigned: ZomeCallUnsigned, signature: Signature) -> Self {
        let ZomeCallUnsigned {
            cell_id,
            zome_name,
            fn_name,
            cap,
            provenance,
            payload,
            nonce,
            expires_at,
        } = unsigned;
        Self {
            cell_id,
            zome_name,
            fn_name,
            cap,
            provenance,
            payload,
            nonce,
            expires_at,
            signature,
        }
    }

    /// Split back into the unsigned call and its signature.
    pub fn into_parts(self) -> (ZomeCallUnsigned, Signature) {
        let unsigned = ZomeCallUnsigned {
            cell_id: self.cell_id,
            zome_name: self.zome_name,
            fn_name: self.fn_name,
            cap: self.cap,
            provenance: self.provenance,
            payload: self.payload,
            nonce: self.nonce,
            expires_at: self.expires_at,
        };
        (unsigned, self.signature)
    }

    /// Recompute the signed bytes from the fields as they are now.
    pub fn data_to_sign(&self) -> ZomeTypesResult<Arc<[u8]>> {
        self.clone().into_parts().0.data_to_sign()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn unsigned() -> ZomeCallUnsigned {
        ZomeCallUnsigned {
            cell_id: CellId::new(
                DnaHash::from_raw_32(vec![1; 32]),
                AgentPubKey::from_raw_32(vec![2; 32]),
            ),
            zome_name: "profiles".into(),
            fn_name: "get_my_profile".into(),
            cap: CallCapability::Unrestricted,
            provenance: AgentPubKey::from_raw_32(vec![2; 32]),
            payload: vec![0xc0].into(),
            nonce: Nonce256Bits([3; 32]),
            expires_at: Timestamp(1_700_000_000_000_000),
        }
    }

    #[test]
    fn canonical_bytes_are_versioned_and_stable() {
        let a = unsigned().canonical_bytes().unwrap();
        let b = unsigned().canonical_bytes().unwrap();
        assert_eq!(a, b);
        assert_eq!(ZOME_CALL_CANONICAL_VERSION, a[0]);
        // fixarray of 9 fields
        assert_eq!(0x99, a[1]);
    }

    #[test]
    fn absent_cap_secret_is_nil() {
        let bytes = unsigned().canonical_bytes().unwrap();
        let mut with_secret = unsigned();
        with_secret.cap = CallCapability::Secret(CapSecret([0; CAP_SECRET_BYTES]));
        let secret_bytes = with_secret.canonical_bytes().unwrap();
        // nil (1 byte) becomes bin8 marker + length + the secret
        assert_eq!(bytes.len() - 1 + 2 + CAP_SECRET_BYTES, secret_bytes.len());
    }

    #[test_case(|c| c.zome_name = "other".into() ; "zome name")]
    #[test_case(|c| c.fn_name = "other".into() ; "fn name")]
    #[test_case(|c| c.payload = vec![0xc3].into() ; "payload")]
    #[test_case(|c| c.cap = CallCapability::Secret(CapSecret([9; 64])) ; "cap secret")]
    #[test_case(|c| c.provenance = AgentPubKey::from_raw_32(vec![8; 32]) ; "provenance")]
    #[test_case(|c| c.nonce = Nonce256Bits([4; 32]) ; "nonce")]
    #[test_case(|c| c.expires_at = Timestamp(1) ; "expires at")]
    #[test_case(|c| c.cell_id = CellId::new(DnaHash::from_raw_32(vec![5; 32]), c.cell_id.agent_pubkey().clone()) ; "dna hash")]
    #[test_case(|c| c.cell_id = CellId::new(c.cell_id.dna_hash().clone(), AgentPubKey::from_raw_32(vec![6; 32])) ; "cell agent")]
    fn every_field_changes_data_to_sign(mutate: fn(&mut ZomeCallUnsigned)) {
        let original = unsigned();
        let mut changed = original.clone();
        mutate(&mut changed);
        assert_ne!(
            original.data_to_sign().unwrap(),
            changed.data_to_sign().unwrap()
        );
    }

    #[test]
    fn field_boundaries_are_unambiguous() {
        let mut a = unsigned();
        a.zome_name = "ab".into();
        a.fn_name = "c".into();
        let mut b = unsigned();
        b.zome_name = "a".into();
        b.fn_name = "bc".into();
        assert_ne!(a.canonical_bytes().unwrap(), b.canonical_bytes().unwrap());
    }

    #[test]
    fn expiry() {
        let mut call = unsigned();
        call.expires_at = Timestamp::ZERO;
        assert!(!call.is_expired_at(Timestamp(i64::MAX)));
        call.expires_at = Timestamp(10);
        assert!(call.is_expired_at(Timestamp(10)));
        assert!(!call.is_expired_at(Timestamp(9)));
    }

    #[test]
    fn signed_call_splits_back() {
        let signed = ZomeCall::from_unsigned(unsigned(), Signature([7; 64]));
        assert_eq!(
            unsigned().data_to_sign().unwrap(),
            signed.data_to_sign().unwrap()
        );
        let (u, s) = signed.into_parts();
        assert_eq!(unsigned(), u);
        assert_eq!(Signature([7; 64]), s);
    }
}
