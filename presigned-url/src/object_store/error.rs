//! Error types for bucket operations

use aws_sdk_s3::{
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::{
        get_object::GetObjectError, head_object::HeadObjectError,
        list_objects_v2::ListObjectsV2Error,
    },
    presigning::PresigningConfigError,
};
use thiserror::Error;

/// Result type for bucket operations
pub type BucketResult<T> = Result<T, BucketError>;

/// Errors that can occur during bucket operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BucketError {
    /// S3 answered with an error response
    #[error("S3 service error ({code}): {message}")]
    S3Error {
        /// S3 error code, or the HTTP status when the response had no body
        code: String,
        /// Human-readable message returned by S3
        message: String,
    },

    /// The request never produced a service response (dispatch, timeout, credentials)
    #[error("AWS SDK error: {0}")]
    AwsError(String),

    /// Presigning configuration was rejected by the SDK
    #[error("Presigning error: {0}")]
    PresignError(String),
}

impl BucketError {
    /// Machine-readable code describing the failure
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::S3Error { code, .. } => code,
            Self::AwsError(_) => "SdkError",
            Self::PresignError(_) => "InvalidPresigningConfig",
        }
    }

    /// Human-readable message describing the failure
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::S3Error { message, .. } => message,
            Self::AwsError(message) | Self::PresignError(message) => message,
        }
    }
}

fn from_sdk_error<E>(error: &SdkError<E>) -> BucketError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    match error {
        SdkError::ServiceError(service_err) => {
            let status = service_err.raw().status().as_u16();
            let err = service_err.err();
            BucketError::S3Error {
                // HEAD responses carry no body, so S3 gives us only the status
                code: err
                    .code()
                    .map_or_else(|| status.to_string(), ToString::to_string),
                message: err
                    .message()
                    .map_or_else(|| status_message(status), ToString::to_string),
            }
        }
        _ => BucketError::AwsError(DisplayErrorContext(error).to_string()),
    }
}

/// Message for an error response that carried no body, e.g. `Forbidden` for 403
fn status_message(status: u16) -> String {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map_or_else(|| format!("HTTP {status}"), ToString::to_string)
}

impl From<SdkError<HeadObjectError>> for BucketError {
    fn from(error: SdkError<HeadObjectError>) -> Self {
        from_sdk_error(&error)
    }
}

impl From<SdkError<GetObjectError>> for BucketError {
    fn from(error: SdkError<GetObjectError>) -> Self {
        from_sdk_error(&error)
    }
}

impl From<SdkError<ListObjectsV2Error>> for BucketError {
    fn from(error: SdkError<ListObjectsV2Error>) -> Self {
        from_sdk_error(&error)
    }
}

impl From<PresigningConfigError> for BucketError {
    fn from(error: PresigningConfigError) -> Self {
        Self::PresignError(error.to_string())
    }
}
