//! Top-level error handling for the command line

use thiserror::Error;

use super::ConfigError;
use crate::provider::ProviderError;

/// Every failure the command line can end with
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration is missing or unusable; nothing was attempted
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A provider operation failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Anything not classified above
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit code for this failure
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Provider(_) | Self::Unexpected(_) => 1,
        }
    }

    /// Message shown to the user, with a remediation hint where one exists
    #[must_use]
    pub fn report(&self) -> String {
        match self {
            Self::Config(err) => format!(
                "Configuration error: {err}\nCheck your environment or the `.env` file.\n"
            ),
            Self::Provider(ProviderError::ObjectNotFound(key)) => format!(
                "Error: object not found: {key}\n\nTo see the available objects run:\n  presigned-url --list\n"
            ),
            Self::Provider(err @ ProviderError::InvalidInput(_)) => format!("Error: {err}\n"),
            Self::Provider(err @ ProviderError::Backend { .. }) => {
                format!("Unexpected error: {err}\n")
            }
            Self::Unexpected(err) => format!("Unexpected error: {err:#}\n"),
        }
    }
}
