//! Replay protection nonces.

use crate::Timestamp;
use std::time::Duration;

/// Byte length of a zome call nonce.
pub const NONCE_BYTES: usize = 32;

/// 256 random bits, unique per zome call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nonce256Bits(pub [u8; NONCE_BYTES]);

crate::fixed_array_serialization!(Nonce256Bits, NONCE_BYTES);

/// How long a freshly generated nonce stays valid.
pub const FRESH_NONCE_EXPIRES_AFTER: Duration = Duration::from_secs(60 * 5);

/// Generate a random nonce together with the expiry time a call using it
/// should carry.
pub fn fresh_nonce(
    now: Timestamp,
) -> Result<(Nonce256Bits, Timestamp), Box<dyn std::error::Error + Send + Sync>> {
    let mut bytes = [0; NONCE_BYTES];
    getrandom::getrandom(&mut bytes)?;
    let expires: Timestamp = now.saturating_add(&FRESH_NONCE_EXPIRES_AFTER);
    Ok((Nonce256Bits::from(bytes), expires))
}
