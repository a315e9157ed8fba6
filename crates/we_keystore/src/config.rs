use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long to wait for the keystore before giving up.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct KeystoreConfig {
    /// Upper bound on the connect handshake, in milliseconds.
    pub connect_timeout_ms: u64,

    /// Upper bound on a single signing round-trip, in milliseconds.
    pub sign_timeout_ms: u64,
}

impl Default for KeystoreConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
            sign_timeout_ms: 30_000,
        }
    }
}

impl KeystoreConfig {
    /// The connect timeout as a [Duration]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// The sign timeout as a [Duration]
    pub fn sign_timeout(&self) -> Duration {
        Duration::from_millis(self.sign_timeout_ms)
    }
}
