//! One signer bound to one keystore session, and the facades the launcher
//! talks to.

use crate::*;
use parking_lot::RwLock;
use std::sync::Arc;
use we_hash::AgentPubKey;
use we_keystore::{KeystoreConfig, KeystoreSession};
use we_zome_types::prelude::*;

/// Where a [Handler] is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    /// Created, no session yet.
    Unconnected,
    /// A connect is in progress.
    Connecting,
    /// Holding an open session.
    Connected,
    /// Closed for good.
    Closed,
}

#[derive(Debug)]
enum Slot {
    Unconnected,
    Connecting,
    Connected(Signer),
    Closed,
}

impl Slot {
    fn state(&self) -> HandlerState {
        match self {
            Slot::Unconnected => HandlerState::Unconnected,
            Slot::Connecting => HandlerState::Connecting,
            Slot::Connected(_) => HandlerState::Connected,
            Slot::Closed => HandlerState::Closed,
        }
    }
}

/// Owns at most one keystore session and signs through it.
///
/// `Unconnected -> Connecting -> Connected -> Closed`. A failed connect
/// goes back to `Unconnected`, `Closed` is terminal.
#[derive(Debug)]
pub struct Handler {
    slot: RwLock<Slot>,
    config: KeystoreConfig,
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler {
    /// A handler with default keystore timeouts.
    pub fn new() -> Self {
        Self::with_config(KeystoreConfig::default())
    }

    /// A handler using the given keystore timeouts.
    pub fn with_config(config: KeystoreConfig) -> Self {
        Self {
            slot: RwLock::new(Slot::Unconnected),
            config,
        }
    }

    /// A connected handler signing through `session`.
    pub fn from_session(session: KeystoreSession) -> Self {
        let config = session.config().clone();
        Self {
            slot: RwLock::new(Slot::Connected(Signer::new(session))),
            config,
        }
    }

    /// Create a handler and connect it.
    pub async fn connect(endpoint: &str, passphrase: &[u8]) -> ZomeCallSignerResult<Self> {
        let handler = Self::new();
        handler.open(endpoint, passphrase).await?;
        Ok(handler)
    }

    /// Create a handler from a config and connect it to the configured
    /// endpoint.
    pub async fn connect_from_config(
        config: &HandlerConfig,
        passphrase: &[u8],
    ) -> ZomeCallSignerResult<Self> {
        let handler = Self::with_config(config.keystore.clone());
        handler.open(config.connection_url()?, passphrase).await?;
        Ok(handler)
    }

    /// The current state.
    pub fn state(&self) -> HandlerState {
        self.slot.read().state()
    }

    /// Connect to the keystore at `endpoint`.
    #[tracing::instrument(skip(self, passphrase))]
    pub async fn open(&self, endpoint: &str, passphrase: &[u8]) -> ZomeCallSignerResult<()> {
        {
            let mut slot = self.slot.write();
            match *slot {
                Slot::Unconnected => *slot = Slot::Connecting,
                Slot::Connecting | Slot::Connected(_) => {
                    return Err(ZomeCallSignerError::AlreadyConnected)
                }
                Slot::Closed => return Err(ZomeCallSignerError::NotConnected),
            }
        }

        let session = match we_keystore::connect_with_config(endpoint, passphrase, &self.config)
            .await
        {
            Ok(session) => session,
            Err(e) => {
                let mut slot = self.slot.write();
                if let Slot::Connecting = *slot {
                    *slot = Slot::Unconnected;
                }
                return Err(e.into());
            }
        };

        let closed_meanwhile = {
            let mut slot = self.slot.write();
            if let Slot::Connecting = *slot {
                *slot = Slot::Connected(Signer::new(session.clone()));
                false
            } else {
                true
            }
        };
        if closed_meanwhile {
            session.close().await.ok();
            return Err(ZomeCallSignerError::NotConnected);
        }
        Ok(())
    }

    fn signer(&self) -> ZomeCallSignerResult<Signer> {
        match &*self.slot.read() {
            Slot::Connected(signer) => Ok(signer.clone()),
            _ => Err(ZomeCallSignerError::NotConnected),
        }
    }

    /// Sign a zome call with the key of its provenance.
    pub async fn sign_zome_call(&self, call: ZomeCallUnsigned) -> ZomeCallSignerResult<ZomeCall> {
        self.signer()?.sign_zome_call(call).await
    }

    /// Validate a JavaScript record, sign it, and hand it back signed.
    pub async fn sign_zome_call_js(
        &self,
        call: ZomeCallUnsignedJs,
    ) -> ZomeCallSignerResult<ZomeCallJs> {
        let signer = self.signer()?;
        let call = ZomeCallUnsigned::try_from(call)?;
        Ok(signer.sign_zome_call(call).await?.into())
    }

    /// Sign arbitrary bytes with the key of `provenance`.
    pub async fn sign_raw(
        &self,
        data: Arc<[u8]>,
        provenance: AgentPubKey,
    ) -> ZomeCallSignerResult<Signature> {
        self.signer()?.sign_raw(data, provenance).await
    }

    /// Unlock a base64 locked seed bundle and import its seed into the
    /// keystore under `tag`.
    #[cfg(feature = "lair_signing")]
    pub async fn import_locked_seed_bundle(
        &self,
        bundle: &str,
        passphrase: &[u8],
        tag: &str,
    ) -> ZomeCallSignerResult<AgentPubKey> {
        let signer = self.signer()?;
        Ok(signer
            .session()
            .import_locked_seed_bundle(bundle, passphrase, tag)
            .await?)
    }

    /// Close the handler and its session. Signing calls still in flight
    /// fail with [`ZomeCallSignerError::NotConnected`].
    pub async fn close(&self) -> ZomeCallSignerResult<()> {
        let previous = std::mem::replace(&mut *self.slot.write(), Slot::Closed);
        if let Slot::Connected(signer) = previous {
            tracing::debug!(endpoint = %signer.session().endpoint(), "closing handler");
            signer.session().close().await?;
        }
        Ok(())
    }
}

macro_rules! js_facade {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name(Handler);

        impl $name {
            /// Connect to the keystore at `keystore_url`.
            pub async fn connect(
                keystore_url: &str,
                passphrase: &str,
            ) -> ZomeCallSignerResult<Self> {
                Ok(Self(Handler::connect(keystore_url, passphrase.as_bytes()).await?))
            }

            /// Connect as described by `config`.
            pub async fn connect_from_config(
                config: &HandlerConfig,
                passphrase: &str,
            ) -> ZomeCallSignerResult<Self> {
                Ok(Self(
                    Handler::connect_from_config(config, passphrase.as_bytes()).await?,
                ))
            }

            /// Sign a zome call record.
            pub async fn sign_zome_call(
                &self,
                zome_call_unsigned_js: ZomeCallUnsignedJs,
            ) -> ZomeCallSignerResult<ZomeCallJs> {
                self.0.sign_zome_call_js(zome_call_unsigned_js).await
            }

            /// Sign a raw payload with the key given as 39 raw bytes.
            pub async fn sign_payload(
                &self,
                payload: Vec<u8>,
                pub_key: Vec<u8>,
            ) -> ZomeCallSignerResult<Vec<u8>> {
                let provenance = AgentPubKey::from_raw_39(pub_key).map_err(|e| {
                    ZomeCallSignerError::InvalidZomeCall(format!("pubKey: {e}"))
                })?;
                let signature = self.0.sign_raw(payload.into(), provenance).await?;
                Ok(signature.0.to_vec())
            }

            /// Close the keystore session.
            pub async fn close(&self) -> ZomeCallSignerResult<()> {
                self.0.close().await
            }

            /// The state of the underlying handler.
            pub fn state(&self) -> HandlerState {
                self.0.state()
            }
        }

        impl From<Handler> for $name {
            fn from(handler: Handler) -> Self {
                Self(handler)
            }
        }
    };
}

js_facade!(
    /// The handler the launcher's main process holds.
    WeRustHandler
);

js_facade!(
    /// The handler handed to app windows for signing their zome calls.
    ZomeCallSigner
);

#[cfg(feature = "lair_signing")]
js_facade!(
    /// The launcher's own lair client, which also imports device seeds.
    MossLairClient
);

#[cfg(feature = "lair_signing")]
impl MossLairClient {
    /// Import the seed of a base64 locked seed bundle under `tag` and
    /// return its agent key in string form.
    pub async fn import_locked_seed_bundle(
        &self,
        import_locked_seed_bundle: &str,
        passphrase: &str,
        tag: &str,
    ) -> ZomeCallSignerResult<String> {
        let agent = self
            .0
            .import_locked_seed_bundle(import_locked_seed_bundle, passphrase.as_bytes(), tag)
            .await?;
        Ok(agent.to_string())
    }
}
