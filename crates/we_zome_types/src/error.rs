/// Errors building or encoding zome call types.
#[derive(Debug, thiserror::Error)]
pub enum ZomeTypesError {
    /// Canonical encoding failed.
    #[error("Failed to encode zome call: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
}

/// Zome types Result type
pub type ZomeTypesResult<T> = Result<T, ZomeTypesError>;
