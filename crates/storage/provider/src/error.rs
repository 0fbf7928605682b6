use alloy_primitives::B256;

/// Alias for results of chain store reads.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failure of a chain store read.
///
/// These are infrastructure errors: a missing entry is `Ok(None)`, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The underlying database failed.
    #[error("database error: {0}")]
    Database(String),
    /// The store returned a body without its header.
    #[error("block body for {0} exists but its header is missing")]
    BlockBodyWithoutHeader(B256),
}
