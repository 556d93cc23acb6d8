//! Storage configuration loaded from the process environment

use std::env;

use aws_config::{retry::RetryConfig, BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::error::DisplayErrorContext;
use thiserror::Error;
use tracing::debug;

/// Default key prefix under which logical objects live
pub const DEFAULT_IMAGES_PREFIX: &str = "images";
/// Default presigned URL lifetime (one hour)
pub const DEFAULT_EXPIRATION_SECS: u64 = 3600;
/// Region used when `AWS_REGION` is not set
pub const DEFAULT_REGION: &str = "ap-southeast-2";

/// Errors raised while building the storage configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or empty
    #[error("{0} is not set")]
    Missing(&'static str),

    /// A variable is present but cannot be used
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Raw value as found in the environment
        value: String,
        /// Why the value was rejected
        reason: &'static str,
    },

    /// The AWS credential chain could not produce credentials
    #[error("AWS credentials are not available: {0}")]
    Credentials(String),
}

/// Immutable storage configuration, validated once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Bucket holding the objects
    pub bucket_name: String,
    /// Key prefix, without the trailing separator
    pub images_prefix: String,
    /// Default presigned URL lifetime in seconds
    pub presigned_url_expiration_secs: u64,
    /// AWS region of the bucket
    pub region: String,
    /// Endpoint override for S3-compatible services and `LocalStack`
    pub endpoint_url: Option<String>,
}

impl StorageConfig {
    /// Reads the configuration from the process environment
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `S3_BUCKET_NAME` | required |
    /// | `S3_IMAGES_PREFIX` | `images` |
    /// | `PRESIGNED_URL_EXPIRATION` | `3600` |
    /// | `AWS_REGION` | `ap-southeast-2` |
    /// | `AWS_ENDPOINT_URL` | unset |
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the bucket name is not set
    /// Returns `ConfigError::Invalid` if the expiration is not a positive integer
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// See [`StorageConfig::from_env`]
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bucket_name =
            non_empty("S3_BUCKET_NAME").ok_or(ConfigError::Missing("S3_BUCKET_NAME"))?;

        let images_prefix = non_empty("S3_IMAGES_PREFIX")
            .unwrap_or_else(|| DEFAULT_IMAGES_PREFIX.to_string());

        let presigned_url_expiration_secs = match non_empty("PRESIGNED_URL_EXPIRATION") {
            None => DEFAULT_EXPIRATION_SECS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        name: "PRESIGNED_URL_EXPIRATION",
                        value: raw,
                        reason: "must be greater than zero",
                    })
                }
                Ok(secs) => secs,
                Err(_) => {
                    return Err(ConfigError::Invalid {
                        name: "PRESIGNED_URL_EXPIRATION",
                        value: raw,
                        reason: "must be a whole number of seconds",
                    })
                }
            },
        };

        let region = non_empty("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
        let endpoint_url = non_empty("AWS_ENDPOINT_URL");

        Ok(Self {
            bucket_name,
            images_prefix,
            presigned_url_expiration_secs,
            region,
            endpoint_url,
        })
    }

    /// AWS configuration for this bucket, with SDK retries turned off
    ///
    /// Credentials are resolved eagerly so that a broken credential chain is
    /// reported as a configuration problem before any request is sent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Credentials` if no usable credentials can be resolved
    pub async fn aws_config(&self) -> Result<SdkConfig, ConfigError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .retry_config(RetryConfig::disabled());

        if let Some(endpoint_url) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let sdk_config = loader.load().await;

        let provider = sdk_config
            .credentials_provider()
            .ok_or_else(|| ConfigError::Credentials("no credentials provider".to_string()))?;
        provider
            .provide_credentials()
            .await
            .map_err(|e| ConfigError::Credentials(DisplayErrorContext(&e).to_string()))?;

        debug!(
            "Loaded AWS configuration for bucket {} in {}",
            self.bucket_name, self.region
        );

        Ok(sdk_config)
    }

    /// AWS S3 service configuration
    ///
    /// # Errors
    ///
    /// See [`StorageConfig::aws_config`]
    pub async fn s3_client_config(&self) -> Result<aws_sdk_s3::Config, ConfigError> {
        let aws_config = self.aws_config().await?;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Custom endpoints (LocalStack, MinIO) rarely support virtual-hosted buckets
        if self.endpoint_url.is_some() {
            builder.set_force_path_style(Some(true));
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serial_test::serial;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config =
            StorageConfig::from_lookup(lookup_from(&[("S3_BUCKET_NAME", "b")])).unwrap();

        assert_eq!(
            config,
            StorageConfig {
                bucket_name: "b".to_string(),
                images_prefix: "images".to_string(),
                presigned_url_expiration_secs: 3600,
                region: "ap-southeast-2".to_string(),
                endpoint_url: None,
            }
        );
    }

    #[test]
    fn test_overrides_applied() {
        let config = StorageConfig::from_lookup(lookup_from(&[
            ("S3_BUCKET_NAME", "media"),
            ("S3_IMAGES_PREFIX", "assets"),
            ("PRESIGNED_URL_EXPIRATION", "120"),
            ("AWS_REGION", "eu-west-1"),
            ("AWS_ENDPOINT_URL", "http://localhost:4566"),
        ]))
        .unwrap();

        assert_eq!(config.bucket_name, "media");
        assert_eq!(config.images_prefix, "assets");
        assert_eq!(config.presigned_url_expiration_secs, 120);
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn test_missing_bucket() {
        let err = StorageConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("S3_BUCKET_NAME"));

        // Blank counts as missing
        let err =
            StorageConfig::from_lookup(lookup_from(&[("S3_BUCKET_NAME", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("S3_BUCKET_NAME"));
    }

    #[test]
    fn test_invalid_expiration() {
        for raw in ["abc", "-5", "1.5", "0"] {
            let err = StorageConfig::from_lookup(lookup_from(&[
                ("S3_BUCKET_NAME", "b"),
                ("PRESIGNED_URL_EXPIRATION", raw),
            ]))
            .unwrap_err();

            assert!(
                matches!(err, ConfigError::Invalid { name: "PRESIGNED_URL_EXPIRATION", .. }),
                "Expected invalid expiration for {raw:?}, got {err:?}"
            );
        }
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var("S3_BUCKET_NAME", "env-bucket");
        env::set_var("PRESIGNED_URL_EXPIRATION", "900");
        env::remove_var("S3_IMAGES_PREFIX");

        let config = StorageConfig::from_env().unwrap();
        assert_eq!(config.bucket_name, "env-bucket");
        assert_eq!(config.images_prefix, "images");
        assert_eq!(config.presigned_url_expiration_secs, 900);

        env::remove_var("S3_BUCKET_NAME");
        assert_eq!(
            StorageConfig::from_env().unwrap_err(),
            ConfigError::Missing("S3_BUCKET_NAME")
        );

        // Cleanup
        env::remove_var("PRESIGNED_URL_EXPIRATION");
    }

    #[tokio::test]
    #[serial]
    async fn test_s3_client_config_uses_configured_region() {
        env::set_var("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE");
        env::set_var("AWS_SECRET_ACCESS_KEY", "secret");

        let config = StorageConfig::from_lookup(lookup_from(&[
            ("S3_BUCKET_NAME", "b"),
            ("AWS_REGION", "us-east-1"),
            ("AWS_ENDPOINT_URL", "http://localhost:4566"),
        ]))
        .unwrap();

        let s3_config = config.s3_client_config().await.unwrap();
        assert_eq!(s3_config.region().map(ToString::to_string).as_deref(), Some("us-east-1"));

        // Cleanup
        env::remove_var("AWS_ACCESS_KEY_ID");
        env::remove_var("AWS_SECRET_ACCESS_KEY");
    }
}
