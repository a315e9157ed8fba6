use we_hash::AgentPubKey;
use we_keystore::KeystoreError;

/// Errors surfaced to callers of the handler facades.
#[derive(Debug, thiserror::Error)]
pub enum ZomeCallSignerError {
    /// The keystore endpoint is malformed, unknown or did not answer.
    #[error("Could not connect to the keystore: {0}")]
    Connection(String),

    /// The keystore rejected the passphrase.
    #[error("The keystore rejected the passphrase")]
    Authentication,

    /// The provenance of the call is not a key held by the keystore.
    #[error("No signing key for provenance {0}")]
    UnknownKey(AgentPubKey),

    /// Producing the signature failed or timed out.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The handler has no open session, or it was closed while the call
    /// was in flight.
    #[error("The handler is not connected to a keystore")]
    NotConnected,

    /// The handler is already connected, or connecting.
    #[error("The handler is already connected to a keystore")]
    AlreadyConnected,

    /// The call's `expires_at` is not in the future.
    #[error("The zome call expired at {expires_at}, it is now {now}")]
    Expired {
        /// When the call stopped being valid, in microseconds.
        expires_at: i64,
        /// The time of the check, in microseconds.
        now: i64,
    },

    /// A field of the call record is malformed.
    #[error("Invalid zome call: {0}")]
    InvalidZomeCall(String),

    /// The handler config could not be read or parsed.
    #[error("Invalid handler config: {0}")]
    Config(String),
}

impl From<KeystoreError> for ZomeCallSignerError {
    fn from(e: KeystoreError) -> Self {
        match e {
            KeystoreError::Connection(e) => Self::Connection(e),
            KeystoreError::Authentication => Self::Authentication,
            KeystoreError::UnknownKey(key) => Self::UnknownKey(key),
            KeystoreError::Signing(e) => Self::Signing(e),
            KeystoreError::SessionClosed => Self::NotConnected,
            KeystoreError::Other(e) => Self::Signing(e),
        }
    }
}

impl From<we_zome_types::ZomeTypesError> for ZomeCallSignerError {
    fn from(e: we_zome_types::ZomeTypesError) -> Self {
        Self::InvalidZomeCall(e.to_string())
    }
}

impl From<serde_yaml::Error> for ZomeCallSignerError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Result type for the signer and its handlers.
pub type ZomeCallSignerResult<T> = Result<T, ZomeCallSignerError>;
