use we_hash::AgentPubKey;

/// Keystore Error Type.
#[derive(Debug, thiserror::Error)]
pub enum KeystoreError {
    /// The endpoint could not be parsed, is unknown or unreachable, or the
    /// handshake did not complete in time.
    #[error("Failed to connect to keystore: {0}")]
    Connection(String),

    /// The keystore rejected the passphrase.
    #[error("Keystore rejected the passphrase")]
    Authentication,

    /// The requested signing key is not held by this keystore.
    #[error("Keystore does not hold a signing key for {0}")]
    UnknownKey(AgentPubKey),

    /// The backend failed while producing a signature.
    #[error("Failed to sign by pub key: {0}")]
    Signing(String),

    /// The session was closed before or during the operation.
    #[error("Keystore session is closed")]
    SessionClosed,

    /// Unexpected Internal Error.
    #[error("Other: {0}")]
    Other(String),
}

impl From<String> for KeystoreError {
    fn from(e: String) -> Self {
        KeystoreError::Other(e)
    }
}

impl From<&str> for KeystoreError {
    fn from(e: &str) -> Self {
        e.to_string().into()
    }
}

/// Keystore Result Type.
pub type KeystoreResult<T> = Result<T, KeystoreError>;
