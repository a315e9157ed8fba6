use crate::*;
use ed25519_dalek::Verifier;
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use we_hash::AgentPubKey;
use we_zome_types::Signature;

/// Extend holo_hash::AgentPubKey with additional signature functionality
/// from Keystore.
pub trait AgentPubKeyExt {
    /// create a new agent keypair in given keystore, returning the AgentPubKey
    fn new_random(session: &KeystoreSession) -> BoxFuture<'static, KeystoreResult<AgentPubKey>>
    where
        Self: Sized;

    /// sign some arbitrary raw bytes
    fn sign_raw(
        &self,
        session: &KeystoreSession,
        data: Arc<[u8]>,
    ) -> BoxFuture<'static, KeystoreResult<Signature>>;

    /// verify a signature for given raw bytes with this agent public_key
    fn verify_signature_raw(&self, signature: &Signature, data: &[u8]) -> bool;
}

impl AgentPubKeyExt for AgentPubKey {
    fn new_random(session: &KeystoreSession) -> BoxFuture<'static, KeystoreResult<AgentPubKey>> {
        let session = session.clone();
        async move { session.new_sign_keypair_random().await }.boxed()
    }

    fn sign_raw(
        &self,
        session: &KeystoreSession,
        data: Arc<[u8]>,
    ) -> BoxFuture<'static, KeystoreResult<Signature>> {
        session.sign_by_pub_key(self.clone(), data).boxed()
    }

    fn verify_signature_raw(&self, signature: &Signature, data: &[u8]) -> bool {
        let pub_key = match ed25519_dalek::VerifyingKey::from_bytes(&self.get_raw_32_array()) {
            Ok(pub_key) => pub_key,
            Err(_) => return false,
        };
        let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
        pub_key.verify(data, &signature).is_ok()
    }
}
