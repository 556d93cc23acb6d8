//! Error types for signed URL operations

use thiserror::Error;

use crate::object_store::BucketError;

/// Result type for signed URL operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors returned by [`super::SignedUrlProvider`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// No object exists under the full storage key
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Any other backend failure, with the backend's own code and message
    #[error("Storage backend error ({code}): {message}")]
    Backend {
        /// Backend error code
        code: String,
        /// Backend error message
        message: String,
    },

    /// The caller passed an unusable name or expiration
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<BucketError> for ProviderError {
    fn from(error: BucketError) -> Self {
        Self::Backend {
            code: error.code().to_string(),
            message: error.message().to_string(),
        }
    }
}
