//! Handler configuration, usually read from a yaml file.

use crate::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use we_keystore::KeystoreConfig;
use we_trace::Output;

/// All the settings a handler needs apart from the passphrase.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(default)]
pub struct HandlerConfig {
    /// Where the keystore lives, e.g. `local://keystore` or a lair
    /// `unix://` url.
    pub keystore_connection_url: Option<String>,

    /// Keystore timeouts.
    pub keystore: KeystoreConfig,

    /// How to log, see [we_trace::init_fmt].
    pub log_output: Output,
}

impl HandlerConfig {
    /// Parse a yaml document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> ZomeCallSignerResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a yaml file.
    pub fn load(path: impl AsRef<Path>) -> ZomeCallSignerResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            ZomeCallSignerError::Config(format!("could not read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// The configured endpoint, or a config error if there is none.
    pub fn connection_url(&self) -> ZomeCallSignerResult<&str> {
        self.keystore_connection_url
            .as_deref()
            .ok_or_else(|| ZomeCallSignerError::Config("keystore_connection_url is not set".into()))
    }

    /// Install the global tracing subscriber for [`HandlerConfig::log_output`].
    /// Does nothing if one is already installed.
    pub fn init_tracing(&self) -> ZomeCallSignerResult<()> {
        match we_trace::init_fmt(self.log_output) {
            Ok(()) | Err(we_trace::errors::TracingError::SetGlobal(_)) => Ok(()),
            Err(e) => Err(ZomeCallSignerError::Config(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matches::assert_matches;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn full_config() {
        let config = HandlerConfig::from_yaml_str(
            r#"
keystore_connection_url: local://keystore
keystore:
  connect_timeout_ms: 2000
  sign_timeout_ms: 5000
log_output: Json
"#,
        )
        .unwrap();
        assert_eq!("local://keystore", config.connection_url().unwrap());
        assert_eq!(Duration::from_secs(2), config.keystore.connect_timeout());
        assert_eq!(Duration::from_secs(5), config.keystore.sign_timeout());
        assert_eq!(Output::Json, config.log_output);
    }

    #[test]
    fn empty_config_takes_defaults() {
        let config = HandlerConfig::from_yaml_str("{}").unwrap();
        assert_eq!(HandlerConfig::default(), config);
        assert_eq!(Output::Log, config.log_output);
        assert_matches!(config.connection_url(), Err(ZomeCallSignerError::Config(_)));
    }

    #[test]
    fn bad_yaml_is_a_config_error() {
        assert_matches!(
            HandlerConfig::from_yaml_str("log_output: Loud"),
            Err(ZomeCallSignerError::Config(_))
        );
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("handler.yaml");
        std::fs::write(&path, "keystore_connection_url: local://from-file\n").unwrap();
        let config = HandlerConfig::load(&path).unwrap();
        assert_eq!(Some("local://from-file".to_string()), config.keystore_connection_url);
        assert_matches!(
            HandlerConfig::load(dir.path().join("missing.yaml")),
            Err(ZomeCallSignerError::Config(_))
        );
    }
}
