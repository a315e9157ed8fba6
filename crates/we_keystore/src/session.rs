use crate::*;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use we_hash::AgentPubKey;
use we_zome_types::Signature;

struct Inner {
    backend: DynKeystoreBackend,
    endpoint: KeystoreEndpoint,
    config: KeystoreConfig,
    closed: watch::Sender<bool>,
}

/// An open, authenticated connection to a keystore.
///
/// Clones share the connection. Once [`KeystoreSession::close`] is called
/// every operation, including those already in flight, resolves to
/// [`KeystoreError::SessionClosed`].
#[derive(Clone)]
pub struct KeystoreSession(Arc<Inner>);

impl std::fmt::Debug for KeystoreSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeystoreSession")
            .field("endpoint", &self.0.endpoint)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Resolves once the session has been closed.
async fn closed_signal(mut closed: watch::Receiver<bool>) {
    while !*closed.borrow_and_update() {
        if closed.changed().await.is_err() {
            return;
        }
    }
}

impl KeystoreSession {
    /// Wrap an already connected backend.
    pub fn new(
        backend: DynKeystoreBackend,
        endpoint: KeystoreEndpoint,
        config: KeystoreConfig,
    ) -> Self {
        let (closed, _) = watch::channel(false);
        Self(Arc::new(Inner {
            backend,
            endpoint,
            config,
            closed,
        }))
    }

    /// The endpoint this session is connected to.
    pub fn endpoint(&self) -> &KeystoreEndpoint {
        &self.0.endpoint
    }

    /// The timeouts this session was opened with.
    pub fn config(&self) -> &KeystoreConfig {
        &self.0.config
    }

    /// Whether [`KeystoreSession::close`] has been called.
    pub fn is_closed(&self) -> bool {
        *self.0.closed.borrow()
    }

    /// Run a backend operation, giving up when the session closes or the
    /// timeout passes.
    async fn guarded<T, F>(
        &self,
        timeout: Duration,
        on_timeout: impl FnOnce() -> KeystoreError,
        fut: F,
    ) -> KeystoreResult<T>
    where
        F: Future<Output = KeystoreResult<T>>,
    {
        let closed = self.0.closed.subscribe();
        if *closed.borrow() {
            return Err(KeystoreError::SessionClosed);
        }
        tokio::select! {
            biased;
            _ = closed_signal(closed) => Err(KeystoreError::SessionClosed),
            res = tokio::time::timeout(timeout, fut) => match res {
                Ok(res) => res,
                Err(_) => Err(on_timeout()),
            },
        }
    }

    /// Generate a new signature for given keypair / data
    pub fn sign_by_pub_key(
        &self,
        pub_key: AgentPubKey,
        data: Arc<[u8]>,
    ) -> impl Future<Output = KeystoreResult<Signature>> + 'static + Send {
        let this = self.clone();
        async move {
            let timeout = this.0.config.sign_timeout();
            let backend = this.0.backend.clone();
            this.guarded(
                timeout,
                || KeystoreError::Signing(format!("no signature within {timeout:?}")),
                backend.sign_by_pub_key(pub_key, data),
            )
            .await
        }
    }

    /// All signing public keys held by the keystore.
    pub async fn list_sign_keys(&self) -> KeystoreResult<Vec<AgentPubKey>> {
        let timeout = self.0.config.sign_timeout();
        self.guarded(
            timeout,
            || KeystoreError::Other(format!("no key list within {timeout:?}")),
            self.0.backend.list_sign_keys(),
        )
        .await
    }

    /// Construct a new randomized signature keypair
    pub async fn new_sign_keypair_random(&self) -> KeystoreResult<AgentPubKey> {
        let tag = nanoid::nanoid!();
        let timeout = self.0.config.sign_timeout();
        self.guarded(
            timeout,
            || KeystoreError::Other(format!("no new keypair within {timeout:?}")),
            self.0.backend.new_seed(Some(tag)),
        )
        .await
    }

    /// Fetch the key stored under `tag`, generating it on first use.
    pub async fn get_or_create_seed(&self, tag: &str) -> KeystoreResult<AgentPubKey> {
        let timeout = self.0.config.sign_timeout();
        let backend = self.0.backend.clone();
        let tag = tag.to_string();
        self.guarded(
            timeout,
            || KeystoreError::Other(format!("no seed within {timeout:?}")),
            async move {
                match backend.get_seed(&tag).await? {
                    Some(pub_key) => Ok(pub_key),
                    None => backend.new_seed(Some(tag)).await,
                }
            },
        )
        .await
    }

    /// Store the signing key derived from a 32 byte ed25519 secret under
    /// `tag`, which must not be in use yet.
    pub async fn import_seed(&self, seed: [u8; 32], tag: &str) -> KeystoreResult<AgentPubKey> {
        let timeout = self.0.config.sign_timeout();
        self.guarded(
            timeout,
            || KeystoreError::Other(format!("no import within {timeout:?}")),
            self.0.backend.import_seed(seed, tag.to_string()),
        )
        .await
    }

    /// Unlock a base64 locked seed bundle with `passphrase` and import its
    /// seed under `tag`.
    #[cfg(feature = "lair_signing")]
    pub async fn import_locked_seed_bundle(
        &self,
        bundle: &str,
        passphrase: &[u8],
        tag: &str,
    ) -> KeystoreResult<AgentPubKey> {
        let seed = seed_bundle::unlock_seed_bundle(bundle, passphrase).await?;
        self.import_seed(seed, tag).await
    }

    /// Close the session. Safe to call more than once.
    pub async fn close(&self) -> KeystoreResult<()> {
        if self.0.closed.send_replace(true) {
            return Ok(());
        }
        tracing::debug!(endpoint = %self.0.endpoint, "closing keystore session");
        self.0.backend.shutdown().await
    }
}
