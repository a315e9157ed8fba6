//! Zome call records in the shape the JavaScript side sends and expects:
//! camelCase keys, hashes as raw 39 byte arrays, everything else as plain
//! byte arrays.

use crate::*;
use we_hash::{AgentPubKey, DnaHash};
use we_zome_types::prelude::*;

/// An unsigned zome call as received from JavaScript.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZomeCallUnsignedJs {
    /// `[dnaHash, agentPubKey]`, 39 bytes each.
    pub cell_id: Vec<Vec<u8>>,
    /// The zome containing the function.
    pub zome_name: String,
    /// The function to call.
    pub fn_name: String,
    /// Already serialized input.
    pub payload: Vec<u8>,
    /// 64 bytes, absent for unrestricted calls.
    #[serde(default)]
    pub cap_secret: Option<Vec<u8>>,
    /// 39 byte agent key the call is signed by.
    pub provenance: Vec<u8>,
    /// 32 bytes.
    pub nonce: Vec<u8>,
    /// Microseconds since the UNIX epoch, 0 for no expiry.
    pub expires_at: i64,
}

/// A signed zome call as returned to JavaScript.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZomeCallJs {
    /// `[dnaHash, agentPubKey]`, 39 bytes each.
    pub cell_id: Vec<Vec<u8>>,
    /// The zome containing the function.
    pub zome_name: String,
    /// The function to call.
    pub fn_name: String,
    /// Already serialized input.
    pub payload: Vec<u8>,
    /// 64 bytes, absent for unrestricted calls.
    pub cap_secret: Option<Vec<u8>>,
    /// 39 byte agent key the call is signed by.
    pub provenance: Vec<u8>,
    /// 32 bytes.
    pub nonce: Vec<u8>,
    /// Microseconds since the UNIX epoch, 0 for no expiry.
    pub expires_at: i64,
    /// 64 byte ed25519 signature.
    pub signature: Vec<u8>,
}

fn invalid(field: &str, e: impl std::fmt::Display) -> ZomeCallSignerError {
    ZomeCallSignerError::InvalidZomeCall(format!("{field}: {e}"))
}

impl TryFrom<ZomeCallUnsignedJs> for ZomeCallUnsigned {
    type Error = ZomeCallSignerError;

    fn try_from(js: ZomeCallUnsignedJs) -> ZomeCallSignerResult<Self> {
        let [dna_hash, agent_pubkey]: [Vec<u8>; 2] = js.cell_id.try_into().map_err(
            |cell_id: Vec<Vec<u8>>| {
                invalid("cellId", format!("expected 2 hashes, found {}", cell_id.len()))
            },
        )?;
        let cell_id = CellId::new(
            DnaHash::from_raw_39(dna_hash).map_err(|e| invalid("cellId[0]", e))?,
            AgentPubKey::from_raw_39(agent_pubkey).map_err(|e| invalid("cellId[1]", e))?,
        );
        let cap = js
            .cap_secret
            .map(CapSecret::try_from)
            .transpose()
            .map_err(|e| invalid("capSecret", e))?
            .into();
        Ok(Self {
            cell_id,
            zome_name: js.zome_name.into(),
            fn_name: js.fn_name.into(),
            cap,
            provenance: AgentPubKey::from_raw_39(js.provenance)
                .map_err(|e| invalid("provenance", e))?,
            payload: js.payload.into(),
            nonce: Nonce256Bits::try_from(js.nonce).map_err(|e| invalid("nonce", e))?,
            expires_at: Timestamp(js.expires_at),
        })
    }
}

impl From<ZomeCallUnsigned> for ZomeCallUnsignedJs {
    fn from(call: ZomeCallUnsigned) -> Self {
        let (dna_hash, agent_pubkey) = call.cell_id.into_dna_and_agent();
        Self {
            cell_id: vec![dna_hash.into_inner(), agent_pubkey.into_inner()],
            zome_name: call.zome_name.0,
            fn_name: call.fn_name.0,
            payload: call.payload.into_vec(),
            cap_secret: Option::<CapSecret>::from(call.cap).map(|s| s.0.to_vec()),
            provenance: call.provenance.into_inner(),
            nonce: call.nonce.0.to_vec(),
            expires_at: call.expires_at.as_micros(),
        }
    }
}

impl From<ZomeCall> for ZomeCallJs {
    fn from(call: ZomeCall) -> Self {
        let (unsigned, signature) = call.into_parts();
        let ZomeCallUnsignedJs {
            cell_id,
            zome_name,
            fn_name,
            payload,
            cap_secret,
            provenance,
            nonce,
            expires_at,
        } = unsigned.into();
        Self {
            cell_id,
            zome_name,
            fn_name,
            payload,
            cap_secret,
            provenance,
            nonce,
            expires_at,
            signature: signature.0.to_vec(),
        }
    }
}

impl TryFrom<ZomeCallJs> for ZomeCall {
    type Error = ZomeCallSignerError;

    fn try_from(js: ZomeCallJs) -> ZomeCallSignerResult<Self> {
        let signature = Signature::try_from(js.signature).map_err(|e| invalid("signature", e))?;
        let unsigned = ZomeCallUnsigned::try_from(ZomeCallUnsignedJs {
            cell_id: js.cell_id,
            zome_name: js.zome_name,
            fn_name: js.fn_name,
            payload: js.payload,
            cap_secret: js.cap_secret,
            provenance: js.provenance,
            nonce: js.nonce,
            expires_at: js.expires_at,
        })?;
        Ok(ZomeCall::from_unsigned(unsigned, signature))
    }
}
