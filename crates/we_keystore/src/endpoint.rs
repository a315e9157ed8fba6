//! Keystore connection endpoints.

use crate::{KeystoreError, KeystoreResult};
use url2::Url2;

/// Scheme of endpoints served by an in-process keystore.
pub const LOCAL_SCHEME: &str = "local";

/// Where a keystore lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeystoreEndpoint {
    /// An in-process keystore bound under this name,
    /// see [`InProcKeystore::bind_local`](crate::InProcKeystore::bind_local).
    Local(String),

    /// A lair keystore IPC socket, as printed by `lair-keystore url`.
    Lair(Url2),
}

impl KeystoreEndpoint {
    /// Parse a connection url.
    pub fn parse(endpoint: &str) -> KeystoreResult<Self> {
        let url = Url2::try_parse(endpoint).map_err(|e| {
            KeystoreError::Connection(format!("Failed to parse keystore URL {endpoint:?}: {e}"))
        })?;
        match url.scheme() {
            LOCAL_SCHEME => match url.host_str() {
                Some(name) if !name.is_empty() => Ok(Self::Local(name.to_string())),
                _ => Err(KeystoreError::Connection(format!(
                    "Local keystore URL {endpoint:?} is missing a keystore name"
                ))),
            },
            "unix" | "named-pipe" => Ok(Self::Lair(url)),
            other => Err(KeystoreError::Connection(format!(
                "Unsupported keystore URL scheme {other:?}"
            ))),
        }
    }
}

impl std::fmt::Display for KeystoreEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(name) => write!(f, "{LOCAL_SCHEME}://{name}"),
            Self::Lair(url) => write!(f, "{}", url.as_str()),
        }
    }
}
