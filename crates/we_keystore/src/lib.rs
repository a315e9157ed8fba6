#![deny(missing_docs)]
//! A Keystore is a secure repository of private keys. A [KeystoreSession]
//! is an open, authenticated connection to one. Keys are addressed by
//! their public [AgentPubKey](we_hash::AgentPubKey) and never leave the
//! keystore.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use we_hash::AgentPubKey;
//! use we_keystore::*;
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() {
//!     let keystore = InProcKeystore::new(b"correct horse");
//!     let binding = keystore.bind_local("doc-example").unwrap();
//!
//!     let session = connect("local://doc-example", b"correct horse").await.unwrap();
//!     let agent = AgentPubKey::new_random(&session).await.unwrap();
//!
//!     let data: Arc<[u8]> = b"signature test data 1".to_vec().into();
//!     let signature = agent.sign_raw(&session, data.clone()).await.unwrap();
//!     assert!(agent.verify_signature_raw(&signature, &data));
//!
//!     session.close().await.unwrap();
//!     drop(binding);
//! }
//! ```

mod agent_pubkey_ext;
mod backend;
mod config;
mod endpoint;
mod error;
mod in_proc;
#[cfg(feature = "lair_signing")]
pub mod lair;
#[cfg(feature = "lair_signing")]
pub mod seed_bundle;
mod session;
pub mod test_keystore;

pub use agent_pubkey_ext::*;
pub use backend::*;
pub use config::*;
pub use endpoint::*;
pub use error::*;
pub use in_proc::{InProcClient, InProcKeystore, LocalBinding};
pub use session::*;

/// Connect to the keystore at `endpoint` with the default timeouts.
pub async fn connect(endpoint: &str, passphrase: &[u8]) -> KeystoreResult<KeystoreSession> {
    connect_with_config(endpoint, passphrase, &KeystoreConfig::default()).await
}

/// Connect to the keystore at `endpoint`, giving up after
/// `config.connect_timeout_ms`.
#[tracing::instrument(skip(passphrase, config))]
pub async fn connect_with_config(
    endpoint: &str,
    passphrase: &[u8],
    config: &KeystoreConfig,
) -> KeystoreResult<KeystoreSession> {
    let endpoint = KeystoreEndpoint::parse(endpoint)?;
    let timeout = config.connect_timeout();
    let backend = tokio::time::timeout(timeout, open_backend(&endpoint, passphrase))
        .await
        .map_err(|_| {
            KeystoreError::Connection(format!("{endpoint} did not answer within {timeout:?}"))
        })??;
    tracing::info!(%endpoint, "connected to keystore");
    Ok(KeystoreSession::new(backend, endpoint, config.clone()))
}

async fn open_backend(
    endpoint: &KeystoreEndpoint,
    passphrase: &[u8],
) -> KeystoreResult<DynKeystoreBackend> {
    match endpoint {
        KeystoreEndpoint::Local(name) => {
            let keystore = in_proc::lookup_local(name).ok_or_else(|| {
                KeystoreError::Connection(format!("no local keystore is bound as {name:?}"))
            })?;
            Ok(std::sync::Arc::new(keystore.new_client(passphrase)?))
        }
        #[cfg(feature = "lair_signing")]
        KeystoreEndpoint::Lair(url) => Ok(std::sync::Arc::new(
            lair::connect_lair(url, passphrase).await?,
        )),
        #[cfg(not(feature = "lair_signing"))]
        KeystoreEndpoint::Lair(url) => Err(KeystoreError::Connection(format!(
            "{} is a lair endpoint, build with the lair_signing feature to use it",
            url.as_str()
        ))),
    }
}
