//! Locked seed bundles, as exported by a device seed generator.

use crate::*;
use base64::Engine;
use hc_seed_bundle::{LockedSeedCipher, UnlockedSeedBundle};
use lair_keystore_api::dependencies::sodoken;
use std::sync::{Arc, Mutex};

/// Decode a url-safe base64 locked seed bundle and unlock its first cipher
/// with `passphrase`, returning the 32 byte ed25519 secret.
///
/// Only passphrase ciphers are supported. A passphrase that does not
/// unlock the cipher is reported as [`KeystoreError::Authentication`].
pub async fn unlock_seed_bundle(bundle: &str, passphrase: &[u8]) -> KeystoreResult<[u8; 32]> {
    let locked = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(bundle)
        .map_err(|e| KeystoreError::Other(format!("seed bundle is not base64: {e}")))?;
    let cipher = UnlockedSeedBundle::from_locked(&locked)
        .await
        .map_err(|e| KeystoreError::Other(format!("not a locked seed bundle: {e}")))?
        .into_iter()
        .next()
        .ok_or_else(|| KeystoreError::Other("seed bundle has no cipher".into()))?;
    let cipher = match cipher {
        LockedSeedCipher::PwHash(cipher) => cipher,
        _ => {
            return Err(KeystoreError::Other(
                "only passphrase seed ciphers are supported".into(),
            ))
        }
    };

    let passphrase = Arc::new(Mutex::new(sodoken::LockedArray::from(passphrase.to_vec())));
    let unlocked = cipher.unlock(passphrase).await.map_err(|e| {
        tracing::debug!(%e, "seed bundle did not unlock");
        KeystoreError::Authentication
    })?;

    let seed = unlocked.get_seed();
    let mut seed = seed
        .lock()
        .map_err(|_| KeystoreError::Other("seed lock poisoned".into()))?;
    let bytes = seed.lock();
    let len = bytes[..].len();
    let out = <[u8; 32]>::try_from(&bytes[..])
        .map_err(|_| KeystoreError::Other(format!("seed is {len} bytes, not 32")))?;
    Ok(out)
}
