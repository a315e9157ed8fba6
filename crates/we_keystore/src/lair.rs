//! Keystore backed by a lair-keystore process.

use crate::*;
use lair_keystore_api::dependencies::{sodoken, url::Url};
use lair_keystore_api::ipc_keystore::ipc_keystore_connect;
use lair_keystore_api::lair_store::{LairEntryInfo, SeedInfo};
use lair_keystore_api::LairClient;
use std::sync::Arc;
use we_hash::AgentPubKey;
use we_zome_types::Signature;

/// A connected lair client.
pub struct LairBackend(LairClient);

/// Connect to lair over its IPC socket.
pub async fn connect_lair(url: &url2::Url2, passphrase: &[u8]) -> KeystoreResult<LairBackend> {
    let url = Url::parse(url.as_str()).map_err(|e| KeystoreError::Connection(e.to_string()))?;
    let passphrase = Arc::new(std::sync::Mutex::new(sodoken::LockedArray::from(
        passphrase.to_vec(),
    )));
    let client = ipc_keystore_connect(url, passphrase).await.map_err(|e| {
        let msg = e.to_string();
        if msg.to_lowercase().contains("passphrase") {
            KeystoreError::Authentication
        } else {
            KeystoreError::Connection(msg)
        }
    })?;
    Ok(LairBackend(client))
}

/// Tag of the seed an imported secret is boxed from.
pub const IMPORT_ENCRYPTION_TAG: &str = "import-encryption-key";

/// Tag of the seed an imported secret is boxed to.
pub const IMPORT_DECRYPTION_TAG: &str = "import-decryption-key";

fn agent(pub_key: &[u8]) -> AgentPubKey {
    AgentPubKey::from_raw_32(pub_key.to_vec())
}

fn lair_err(e: impl std::fmt::Display) -> KeystoreError {
    KeystoreError::Other(e.to_string())
}

impl LairBackend {
    async fn get_or_create_seed_info(&self, tag: &str) -> KeystoreResult<SeedInfo> {
        match self.0.get_entry(tag.into()).await {
            Ok(LairEntryInfo::Seed { seed_info, .. }) => Ok(seed_info),
            Ok(other) => Err(KeystoreError::Other(format!(
                "lair entry {tag:?} is not a seed: {other:?}"
            ))),
            Err(_) => self
                .0
                .new_seed(tag.into(), None, false)
                .await
                .map_err(lair_err),
        }
    }
}

#[async_trait::async_trait]
impl KeystoreBackend for LairBackend {
    async fn sign_by_pub_key(
        &self,
        pub_key: AgentPubKey,
        data: Arc<[u8]>,
    ) -> KeystoreResult<Signature> {
        let res = self
            .0
            .sign_by_pub_key(pub_key.get_raw_32_array().into(), None, data)
            .await;
        match res {
            Ok(sig) => Ok(Signature(*sig.0)),
            // lair does not tell a missing key apart from other failures
            Err(e) => Err(match self.list_sign_keys().await {
                Ok(held) => sign_failure(pub_key, &held, e),
                Err(_) => KeystoreError::Signing(e.to_string()),
            }),
        }
    }

    async fn list_sign_keys(&self) -> KeystoreResult<Vec<AgentPubKey>> {
        let entries = self.0.list_entries().await.map_err(lair_err)?;
        let mut tags = Vec::new();
        for entry in entries {
            if let LairEntryInfo::Seed { seed_info, .. } = entry {
                tags.push(agent(&*seed_info.ed25519_pub_key.0));
            }
        }
        tags.sort();
        Ok(tags)
    }

    async fn new_seed(&self, tag: Option<String>) -> KeystoreResult<AgentPubKey> {
        let tag = tag.unwrap_or_else(|| nanoid::nanoid!());
        let info = self.0.new_seed(tag.into(), None, false).await.map_err(lair_err)?;
        Ok(agent(&*info.ed25519_pub_key.0))
    }

    async fn get_seed(&self, tag: &str) -> KeystoreResult<Option<AgentPubKey>> {
        match self.0.get_entry(tag.into()).await {
            Ok(LairEntryInfo::Seed { seed_info, .. }) => {
                Ok(Some(agent(&*seed_info.ed25519_pub_key.0)))
            }
            Ok(other) => Err(KeystoreError::Other(format!(
                "lair entry {tag:?} is not a seed: {other:?}"
            ))),
            Err(_) => Ok(None),
        }
    }

    async fn import_seed(&self, seed: [u8; 32], tag: String) -> KeystoreResult<AgentPubKey> {
        let sender = self.get_or_create_seed_info(IMPORT_ENCRYPTION_TAG).await?;
        let recipient = self.get_or_create_seed_info(IMPORT_DECRYPTION_TAG).await?;
        let (nonce, cipher) = self
            .0
            .crypto_box_xsalsa_by_pub_key(
                sender.x25519_pub_key.clone(),
                recipient.x25519_pub_key.clone(),
                None,
                seed.to_vec().into(),
            )
            .await
            .map_err(lair_err)?;
        let info = self
            .0
            .import_seed(
                sender.x25519_pub_key,
                recipient.x25519_pub_key,
                None,
                nonce,
                cipher,
                tag.as_str().into(),
                false,
            )
            .await
            .map_err(lair_err)?;
        tracing::debug!(%tag, "imported seed into lair");
        Ok(agent(&*info.ed25519_pub_key.0))
    }

    async fn shutdown(&self) -> KeystoreResult<()> {
        self.0.shutdown().await.map_err(lair_err)
    }
}
