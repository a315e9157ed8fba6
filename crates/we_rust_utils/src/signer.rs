//! Turns unsigned zome calls into signed ones.

use crate::*;
use std::sync::Arc;
use we_hash::AgentPubKey;
use we_keystore::KeystoreSession;
use we_zome_types::prelude::*;

/// Signs zome calls with the provenance's key, held in the session's
/// keystore. Cheap to clone, clones share the session.
#[derive(Debug, Clone)]
pub struct Signer {
    session: KeystoreSession,
}

impl Signer {
    /// Sign through an open session.
    pub fn new(session: KeystoreSession) -> Self {
        Self { session }
    }

    /// The session signatures are requested from.
    pub fn session(&self) -> &KeystoreSession {
        &self.session
    }

    /// Sign a zome call as of now.
    pub async fn sign_zome_call(&self, call: ZomeCallUnsigned) -> ZomeCallSignerResult<ZomeCall> {
        self.sign_zome_call_at(call, Timestamp::now()).await
    }

    /// Sign a zome call, treating `now` as the current time for the expiry
    /// check.
    ///
    /// A call whose `expires_at` is set and not after `now` is rejected
    /// without contacting the keystore.
    #[tracing::instrument(skip_all, fields(zome = %call.zome_name, func = %call.fn_name, provenance = %call.provenance))]
    pub async fn sign_zome_call_at(
        &self,
        call: ZomeCallUnsigned,
        now: Timestamp,
    ) -> ZomeCallSignerResult<ZomeCall> {
        if call.is_expired_at(now) {
            return Err(ZomeCallSignerError::Expired {
                expires_at: call.expires_at.as_micros(),
                now: now.as_micros(),
            });
        }
        let data = call.data_to_sign()?;
        let signature = self
            .session
            .sign_by_pub_key(call.provenance.clone(), data)
            .await?;
        tracing::trace!("signed zome call");
        Ok(ZomeCall::from_unsigned(call, signature))
    }

    /// Sign arbitrary bytes with the key of `provenance`.
    #[tracing::instrument(skip(self, data))]
    pub async fn sign_raw(
        &self,
        data: Arc<[u8]>,
        provenance: AgentPubKey,
    ) -> ZomeCallSignerResult<Signature> {
        Ok(self.session.sign_by_pub_key(provenance, data).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matches::assert_matches;
    use we_keystore::test_keystore::*;
    use we_keystore::AgentPubKeyExt;

    fn call(provenance: AgentPubKey, expires_at: Timestamp) -> ZomeCallUnsigned {
        ZomeCallUnsigned {
            cell_id: CellId::new(DnaHash::from_raw_32(vec![1; 32]), provenance.clone()),
            zome_name: "profiles".into(),
            fn_name: "create_profile".into(),
            cap: CallCapability::Unrestricted,
            provenance,
            payload: vec![0xc0].into(),
            nonce: Nonce256Bits([7; 32]),
            expires_at,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn signature_covers_the_canonical_bytes() {
        let (session, _binding) = spawn_test_keystore().await.unwrap();
        let agent: AgentPubKey = TEST_AGENT_PK_1.parse().unwrap();
        let signer = Signer::new(session);

        let unsigned = call(agent.clone(), Timestamp::ZERO);
        let signed = signer.sign_zome_call(unsigned.clone()).await.unwrap();
        let data = unsigned.data_to_sign().unwrap();
        assert!(agent.verify_signature_raw(&signed.signature, &data));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn expired_calls_never_reach_the_keystore() {
        let (session, _binding) = spawn_test_keystore().await.unwrap();
        let signer = Signer::new(session.clone());
        session.close().await.unwrap();

        // a closed session would report NotConnected if it were asked
        let stranger = AgentPubKey::from_raw_32(vec![9; 32]);
        let res = signer
            .sign_zome_call_at(call(stranger, Timestamp(100)), Timestamp(100))
            .await;
        assert_matches!(
            res,
            Err(ZomeCallSignerError::Expired {
                expires_at: 100,
                now: 100
            })
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn raw_bytes_sign_with_the_given_key() {
        let (session, _binding) = spawn_test_keystore().await.unwrap();
        let agent: AgentPubKey = TEST_AGENT_PK_4.parse().unwrap();
        let signer = Signer::new(session);
        let data: Arc<[u8]> = b"launcher payload".to_vec().into();
        let signature = signer.sign_raw(data.clone(), agent.clone()).await.unwrap();
        assert!(agent.verify_signature_raw(&signature, &data));
    }
}
