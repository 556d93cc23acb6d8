mod config;
mod error;

pub use config::{
    ConfigError, StorageConfig, DEFAULT_EXPIRATION_SECS, DEFAULT_IMAGES_PREFIX, DEFAULT_REGION,
};
pub use error::CliError;
