use crate::{KeystoreError, KeystoreResult};
use std::sync::Arc;
use we_hash::AgentPubKey;
use we_zome_types::Signature;

/// A connected, authenticated keystore client.
///
/// Keys are always addressed by their public key, a backend never exposes
/// private key material.
#[async_trait::async_trait]
pub trait KeystoreBackend: 'static + Send + Sync {
    /// Sign `data` with the private key belonging to `pub_key`.
    /// Fails with [`KeystoreError::UnknownKey`](crate::KeystoreError::UnknownKey)
    /// if that key is not held.
    async fn sign_by_pub_key(
        &self,
        pub_key: AgentPubKey,
        data: Arc<[u8]>,
    ) -> KeystoreResult<Signature>;

    /// All signing public keys held by the keystore.
    async fn list_sign_keys(&self) -> KeystoreResult<Vec<AgentPubKey>>;

    /// Generate a new random signing keypair, optionally under a tag.
    async fn new_seed(&self, tag: Option<String>) -> KeystoreResult<AgentPubKey>;

    /// Look up the signing key stored under a tag.
    async fn get_seed(&self, tag: &str) -> KeystoreResult<Option<AgentPubKey>>;

    /// Store the signing key derived from a 32 byte ed25519 secret under a
    /// new tag.
    async fn import_seed(&self, seed: [u8; 32], tag: String) -> KeystoreResult<AgentPubKey>;

    /// Release whatever the client holds.
    async fn shutdown(&self) -> KeystoreResult<()>;
}

/// Shared handle to a backend.
pub type DynKeystoreBackend = Arc<dyn KeystoreBackend>;

/// The error for a signature a backend refused to make: `UnknownKey` when
/// `pub_key` is not among the `held` keys, `Signing` otherwise.
pub fn sign_failure(
    pub_key: AgentPubKey,
    held: &[AgentPubKey],
    reason: impl std::fmt::Display,
) -> KeystoreError {
    if held.contains(&pub_key) {
        KeystoreError::Signing(reason.to_string())
    } else {
        KeystoreError::UnknownKey(pub_key)
    }
}
