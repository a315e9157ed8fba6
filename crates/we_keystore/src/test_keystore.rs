//! DANGER! This is a mock keystore for testing, DO NOT USE THIS IN PRODUCTION!

use crate::*;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Passphrase unlocking the test keystore.
pub const TEST_PASSPHRASE: &[u8] = b"test-passphrase";

/// First Test Agent Pub Key
pub const TEST_AGENT_PK_1: &str = "uhCAkJCuynkgVdMn_bzZ2ZYaVfygkn0WCuzfFspczxFnZM1QAyXoo";
const SEED_1: &str = "m-U7gdxW1A647O-4wkuCWOvtGGVfHEsxNScFKiL8-k8";

/// Second Test Agent Pub Key
pub const TEST_AGENT_PK_2: &str = "uhCAk39SDf7rynCg5bYgzroGaOJKGKrloI1o57Xao6S-U5KNZ0dUH";
const SEED_2: &str = "v9I5GT3xVKPcaa4uyd2pcuJromf5zv1-OaahYOLBAWY";

/// Third Test Agent Pub Key
pub const TEST_AGENT_PK_3: &str = "uhCAkwfTgZ5eDJwI6ZV5vGt-kg8cVgXvcf35XKj6HnMv4PBH8noYB";
const SEED_3: &str = "NE_0oUEATrsTR0o7JM1H8I6X6dtXg51iZvtCHAw6Fgg";

/// Fourth Test Agent Pub Key
pub const TEST_AGENT_PK_4: &str = "uhCAkQHMlYam1PRiYJCzAwQ0AUxIMwOoOvxgXS67N_YPOMj-fGx6X";
const SEED_4: &str = "2o79pTXHaK1FTPZeBiJo2lCgXW_P0ULjX_5Div_2qxU";

fn seed(s: &str) -> KeystoreResult<[u8; 32]> {
    let raw = URL_SAFE_NO_PAD
        .decode(s)
        .map_err(|e| KeystoreError::Other(e.to_string()))?;
    let mut out = [0; 32];
    if raw.len() != out.len() {
        return Err(format!("bad test seed length {}", raw.len()).into());
    }
    out.copy_from_slice(&raw);
    Ok(out)
}

/// An in-process keystore holding the four test agent keys, unlocked by
/// [TEST_PASSPHRASE] and not yet bound to any endpoint.
pub fn test_keystore() -> KeystoreResult<InProcKeystore> {
    let keystore = InProcKeystore::new(TEST_PASSPHRASE);
    for s in [SEED_1, SEED_2, SEED_3, SEED_4] {
        keystore.import_sign_keypair(seed(s)?, None);
    }
    Ok(keystore)
}

/// Construct a new TestKeystore, bound under a random `local://` name, and
/// open a session to it. The keystore stays reachable while the returned
/// binding lives.
/// DANGER! This is a mock keystore for testing, DO NOT USE THIS IN PRODUCTION!
pub async fn spawn_test_keystore() -> KeystoreResult<(KeystoreSession, LocalBinding)> {
    let binding = test_keystore()?.bind_local(format!("test-{}", nanoid::nanoid!()))?;
    let session = connect(&binding.url(), TEST_PASSPHRASE).await?;
    Ok((session, binding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use we_hash::AgentPubKey;

    #[tokio::test(flavor = "multi_thread")]
    async fn holds_the_four_test_agents() {
        let (session, _binding) = spawn_test_keystore().await.unwrap();
        let mut expected: Vec<AgentPubKey> = [
            TEST_AGENT_PK_1,
            TEST_AGENT_PK_2,
            TEST_AGENT_PK_3,
            TEST_AGENT_PK_4,
        ]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
        expected.sort();
        assert_eq!(expected, session.list_sign_keys().await.unwrap());
    }
}
