//! Capability claims carried by a zome call.

/// The number of bits we want for a comfy secret.
pub const CAP_SECRET_BITS: usize = 512;
/// The number of bytes we want for a comfy secret.
pub const CAP_SECRET_BYTES: usize = CAP_SECRET_BITS / 8;
/// A fixed size array of bytes that a secret must be.
pub type CapSecretBytes = [u8; CAP_SECRET_BYTES];

/// A CapSecret is used by a caller to prove to a callee access to a committed CapGrant.
///
/// Capability secrets are closer to API keys than to cryptographic secrets,
/// but they still get constant time comparison and hidden debug output.
#[derive(Clone, Copy)]
pub struct CapSecret(pub CapSecretBytes);

crate::secure_primitive!(CapSecret, CAP_SECRET_BYTES);

/// The capability a zome call claims.
///
/// `Unrestricted` relies on an unrestricted (or author) grant on the callee
/// side, `Secret` presents a secret from an assigned or transferable grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallCapability {
    /// Present a capability secret.
    Secret(CapSecret),
    /// No secret, rely on an unrestricted grant.
    Unrestricted,
}

impl CallCapability {
    /// The secret, if one is presented.
    pub fn secret(&self) -> Option<&CapSecret> {
        match self {
            CallCapability::Secret(secret) => Some(secret),
            CallCapability::Unrestricted => None,
        }
    }
}

impl From<Option<CapSecret>> for CallCapability {
    fn from(secret: Option<CapSecret>) -> Self {
        match secret {
            Some(secret) => CallCapability::Secret(secret),
            None => CallCapability::Unrestricted,
        }
    }
}

impl From<CallCapability> for Option<CapSecret> {
    fn from(cap: CallCapability) -> Self {
        cap.secret().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SecurePrimitiveError;

    #[test]
    fn secret_debug_hides_bytes() {
        let secret = CapSecret([0xab; CAP_SECRET_BYTES]);
        let out = format!("{:?}", secret);
        assert!(!out.contains("171"));
        assert!(out.contains("hidden"));
    }

    #[test]
    fn secret_length_is_checked() {
        assert_eq!(
            Err(SecurePrimitiveError::BadSize {
                expected: 64,
                found: 32
            }),
            CapSecret::try_from(vec![0; 32]).map(|_| ()),
        );
        assert!(CapSecret::try_from(vec![0; 64]).is_ok());
    }

    #[test]
    fn option_maps_to_explicit_branch() {
        assert_eq!(CallCapability::Unrestricted, None.into());
        let secret = CapSecret([1; CAP_SECRET_BYTES]);
        assert_eq!(CallCapability::Secret(secret), Some(secret).into());
        assert_eq!(Some(secret), Option::<CapSecret>::from(CallCapability::Secret(secret)));
    }
}
