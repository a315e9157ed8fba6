//! A keystore living inside this process.

use crate::*;
use ed25519_dalek::{Signer, SigningKey};
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use rand::RngCore;
use sha2::{Digest, Sha512};
use std::collections::HashMap;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use we_hash::AgentPubKey;
use we_zome_types::Signature;

static LOCAL_KEYSTORES: Lazy<Mutex<HashMap<String, InProcKeystore>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Find the keystore bound under `name`.
pub(crate) fn lookup_local(name: &str) -> Option<InProcKeystore> {
    LOCAL_KEYSTORES.lock().get(name).cloned()
}

struct Inner {
    salt: [u8; 32],
    passphrase_digest: [u8; 64],
    keys: RwLock<HashMap<[u8; 32], SigningKey>>,
    tags: RwLock<HashMap<String, [u8; 32]>>,
}

/// An in-memory ed25519 keystore, unlocked by a passphrase.
///
/// Only a salted digest of the passphrase is kept. Clones share the same
/// keys.
#[derive(Clone)]
pub struct InProcKeystore(Arc<Inner>);

impl std::fmt::Debug for InProcKeystore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InProcKeystore")
            .field("key_count", &self.0.keys.read().len())
            .finish()
    }
}

fn digest_passphrase(salt: &[u8; 32], passphrase: &[u8]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    hasher.update(salt);
    hasher.update(passphrase);
    let mut out = [0; 64];
    out.copy_from_slice(&hasher.finalize());
    out
}

impl InProcKeystore {
    /// Create an empty keystore locked with `passphrase`.
    pub fn new(passphrase: &[u8]) -> Self {
        let mut salt = [0; 32];
        rand::rngs::OsRng.fill_bytes(&mut salt);
        Self(Arc::new(Inner {
            salt,
            passphrase_digest: digest_passphrase(&salt, passphrase),
            keys: RwLock::new(HashMap::new()),
            tags: RwLock::new(HashMap::new()),
        }))
    }

    /// Make this keystore reachable at `local://<name>` for as long as the
    /// returned binding lives.
    pub fn bind_local(&self, name: impl Into<String>) -> KeystoreResult<LocalBinding> {
        let name = name.into();
        let mut all = LOCAL_KEYSTORES.lock();
        if all.contains_key(&name) {
            return Err(KeystoreError::Other(format!(
                "a local keystore is already bound as {name:?}"
            )));
        }
        all.insert(name.clone(), self.clone());
        tracing::debug!(%name, "bound local keystore");
        Ok(LocalBinding { name })
    }

    /// Authenticate and get a client for this keystore.
    pub fn new_client(&self, passphrase: &[u8]) -> KeystoreResult<InProcClient> {
        let digest = digest_passphrase(&self.0.salt, passphrase);
        if bool::from(digest.ct_eq(&self.0.passphrase_digest)) {
            Ok(InProcClient(self.clone()))
        } else {
            Err(KeystoreError::Authentication)
        }
    }

    /// Store a keypair derived from a 32 byte ed25519 secret.
    pub fn import_sign_keypair(&self, seed: [u8; 32], tag: Option<String>) -> AgentPubKey {
        self.insert(SigningKey::from_bytes(&seed), tag)
    }

    fn insert(&self, key: SigningKey, tag: Option<String>) -> AgentPubKey {
        let mut tags = self.0.tags.write();
        self.0.store(&mut tags, key, tag)
    }
}

impl Inner {
    /// Lock order is `tags` then `keys`.
    fn store(
        &self,
        tags: &mut HashMap<String, [u8; 32]>,
        key: SigningKey,
        tag: Option<String>,
    ) -> AgentPubKey {
        let pub_key = key.verifying_key().to_bytes();
        self.keys.write().insert(pub_key, key);
        if let Some(tag) = tag {
            tags.insert(tag, pub_key);
        }
        AgentPubKey::from_raw_32(pub_key.to_vec())
    }
}

/// Removes a local keystore binding when dropped.
#[derive(Debug)]
pub struct LocalBinding {
    name: String,
}

impl LocalBinding {
    /// The name this keystore is reachable under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full `local://` url of this binding.
    pub fn url(&self) -> String {
        format!("{}://{}", LOCAL_SCHEME, self.name)
    }
}

impl Drop for LocalBinding {
    fn drop(&mut self) {
        LOCAL_KEYSTORES.lock().remove(&self.name);
    }
}

/// An authenticated client of an [InProcKeystore].
#[derive(Debug, Clone)]
pub struct InProcClient(InProcKeystore);

impl InProcClient {
    fn inner(&self) -> &Inner {
        &self.0 .0
    }

    /// Store a key under a tag not yet in use. The tag check and the insert
    /// happen under one lock.
    fn store_new(
        &self,
        tag: Option<String>,
        key: impl FnOnce() -> SigningKey,
    ) -> KeystoreResult<AgentPubKey> {
        let inner = self.inner();
        let mut tags = inner.tags.write();
        if let Some(tag) = &tag {
            if tags.contains_key(tag) {
                return Err(KeystoreError::Other(format!(
                    "a seed is already tagged {tag:?}"
                )));
            }
        }
        Ok(inner.store(&mut tags, key(), tag))
    }
}

#[async_trait::async_trait]
impl KeystoreBackend for InProcClient {
    async fn sign_by_pub_key(
        &self,
        pub_key: AgentPubKey,
        data: Arc<[u8]>,
    ) -> KeystoreResult<Signature> {
        let keys = self.inner().keys.read();
        let key = keys
            .get(pub_key.get_raw_32())
            .ok_or_else(|| KeystoreError::UnknownKey(pub_key.clone()))?;
        Ok(Signature(key.sign(&data).to_bytes()))
    }

    async fn list_sign_keys(&self) -> KeystoreResult<Vec<AgentPubKey>> {
        let mut keys: Vec<AgentPubKey> = self
            .inner()
            .keys
            .read()
            .keys()
            .map(|k| AgentPubKey::from_raw_32(k.to_vec()))
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn new_seed(&self, tag: Option<String>) -> KeystoreResult<AgentPubKey> {
        self.store_new(tag, || SigningKey::generate(&mut rand::rngs::OsRng))
    }

    async fn get_seed(&self, tag: &str) -> KeystoreResult<Option<AgentPubKey>> {
        Ok(self
            .inner()
            .tags
            .read()
            .get(tag)
            .map(|k| AgentPubKey::from_raw_32(k.to_vec())))
    }

    async fn import_seed(&self, seed: [u8; 32], tag: String) -> KeystoreResult<AgentPubKey> {
        self.store_new(Some(tag), || SigningKey::from_bytes(&seed))
    }

    async fn shutdown(&self) -> KeystoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matches::assert_matches;

    #[test]
    fn wrong_passphrase_is_rejected() {
        let keystore = InProcKeystore::new(b"correct");
        assert!(keystore.new_client(b"correct").is_ok());
        assert_matches!(
            keystore.new_client(b"wrong"),
            Err(KeystoreError::Authentication)
        );
        assert_matches!(keystore.new_client(b""), Err(KeystoreError::Authentication));
    }

    #[test]
    fn binding_is_released_on_drop() {
        let name = format!("bind-{}", nanoid::nanoid!());
        let keystore = InProcKeystore::new(b"pass");
        let binding = keystore.bind_local(name.clone()).unwrap();
        assert_eq!(format!("local://{name}"), binding.url());
        assert!(lookup_local(&name).is_some());
        assert!(keystore.bind_local(name.clone()).is_err());
        drop(binding);
        assert!(lookup_local(&name).is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn tagged_seeds() {
        let client = InProcKeystore::new(b"pass").new_client(b"pass").unwrap();
        assert_eq!(None, client.get_seed("a").await.unwrap());
        let a = client.new_seed(Some("a".into())).await.unwrap();
        assert_eq!(Some(a.clone()), client.get_seed("a").await.unwrap());
        assert!(client.new_seed(Some("a".into())).await.is_err());
        let b = client.new_seed(None).await.unwrap();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(expected, client.list_sign_keys().await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn racing_seeds_share_one_tag() {
        let client = InProcKeystore::new(b"pass").new_client(b"pass").unwrap();
        let results = futures::future::join_all((0..16).map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.new_seed(Some("race".into())).await })
        }))
        .await;
        let created: Vec<AgentPubKey> = results
            .into_iter()
            .filter_map(|r| r.unwrap().ok())
            .collect();
        assert_eq!(1, created.len());
        assert_eq!(Some(created[0].clone()), client.get_seed("race").await.unwrap());
        assert_eq!(created, client.list_sign_keys().await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn imported_seed_signs_as_its_public_key() {
        let client = InProcKeystore::new(b"pass").new_client(b"pass").unwrap();
        let expected = AgentPubKey::from_raw_32(
            SigningKey::from_bytes(&[7; 32])
                .verifying_key()
                .to_bytes()
                .to_vec(),
        );

        let imported = client.import_seed([7; 32], "device".into()).await.unwrap();
        assert_eq!(expected, imported);
        assert_eq!(Some(imported.clone()), client.get_seed("device").await.unwrap());
        assert_matches!(
            client.import_seed([8; 32], "device".into()).await,
            Err(KeystoreError::Other(_))
        );
        assert_eq!(vec![imported.clone()], client.list_sign_keys().await.unwrap());

        let data: Arc<[u8]> = vec![1, 2, 3].into();
        let signature = client.sign_by_pub_key(imported.clone(), data.clone()).await.unwrap();
        assert!(imported.verify_signature_raw(&signature, &data));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unknown_key_is_reported() {
        let client = InProcKeystore::new(b"pass").new_client(b"pass").unwrap();
        let stranger = AgentPubKey::from_raw_32(vec![42; 32]);
        let res = client
            .sign_by_pub_key(stranger.clone(), vec![1, 2, 3].into())
            .await;
        assert_matches!(res, Err(KeystoreError::UnknownKey(k)) if k == stranger);
    }
}
