//! Signed download URLs for objects stored under a key prefix
mod error;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::{debug, error, info};

pub use error::{ProviderError, ProviderResult};

use crate::object_store::ObjectStore;
use crate::types::StorageConfig;

/// Separator between the prefix and the logical name
pub const KEY_SEPARATOR: char = '/';

/// A logical object name resolved against the configured prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectReference {
    logical_name: String,
    full_key: String,
}

impl ObjectReference {
    /// Resolves `logical_name` to `prefix/logical_name`, verbatim
    #[must_use]
    pub fn new(prefix: &str, logical_name: &str) -> Self {
        Self {
            logical_name: logical_name.to_string(),
            full_key: format!("{prefix}{KEY_SEPARATOR}{logical_name}"),
        }
    }

    /// Name as supplied by the caller
    #[must_use]
    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    /// Key as stored in the bucket
    #[must_use]
    pub fn full_key(&self) -> &str {
        &self.full_key
    }
}

/// A generated download URL
///
/// `expires_at` is computed locally at generation time and is informational;
/// the storage service alone decides when the signature stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedUrlResult {
    /// The presigned GET URL
    pub url: String,
    /// UTC timestamp when the URL expires
    pub expires_at: DateTime<Utc>,
    /// Lifetime the URL was signed for
    pub expires_in_seconds: u64,
    /// Full storage key the URL points at
    pub object_key: String,
}

/// Issues signed download URLs and lists the objects available under a prefix
pub struct SignedUrlProvider {
    store: Arc<dyn ObjectStore>,
    images_prefix: String,
    default_expiration_secs: u64,
}

impl SignedUrlProvider {
    /// Creates a new provider
    ///
    /// # Arguments
    ///
    /// * `store` - Backend used for existence checks, signing and listing
    /// * `config` - Supplies the key prefix and the default expiration
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, config: &StorageConfig) -> Self {
        Self {
            store,
            images_prefix: config.images_prefix.clone(),
            default_expiration_secs: config.presigned_url_expiration_secs,
        }
    }

    /// Resolves a logical name against the configured prefix
    #[must_use]
    pub fn object_reference(&self, logical_name: &str) -> ObjectReference {
        ObjectReference::new(&self.images_prefix, logical_name)
    }

    /// Generates a signed GET URL for `logical_name`
    ///
    /// The object must exist; nothing is signed otherwise.
    ///
    /// # Arguments
    ///
    /// * `logical_name` - Object name without the prefix (e.g. `logo.png`)
    /// * `expiration_secs` - Overrides the configured default when set
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidInput` for an empty name or a zero expiration
    /// Returns `ProviderError::ObjectNotFound` if no object exists under the full key
    /// Returns `ProviderError::Backend` for any other storage failure
    pub async fn generate_signed_url(
        &self,
        logical_name: &str,
        expiration_secs: Option<u64>,
    ) -> ProviderResult<SignedUrlResult> {
        if logical_name.is_empty() {
            return Err(ProviderError::InvalidInput(
                "object name must not be empty".to_string(),
            ));
        }

        let expiration_secs = expiration_secs.unwrap_or(self.default_expiration_secs);
        if expiration_secs == 0 {
            return Err(ProviderError::InvalidInput(
                "expiration must be greater than zero".to_string(),
            ));
        }
        let validity = i64::try_from(expiration_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| {
                ProviderError::InvalidInput(format!(
                    "expiration of {expiration_secs}s is out of range"
                ))
            })?;

        let reference = self.object_reference(logical_name);
        let object_key = reference.full_key();

        if !self.store.object_exists(object_key).await? {
            debug!("Refusing to sign missing object: {object_key}");
            return Err(ProviderError::ObjectNotFound(object_key.to_string()));
        }

        let url = self
            .store
            .presign_get(object_key, Duration::from_secs(expiration_secs))
            .await?;

        let expires_at = Utc::now().checked_add_signed(validity).ok_or_else(|| {
            ProviderError::InvalidInput(format!(
                "expiration of {expiration_secs}s is out of range"
            ))
        })?;

        info!("Generated signed URL for {object_key} expiring at {expires_at}");

        Ok(SignedUrlResult {
            url,
            expires_at,
            expires_in_seconds: expiration_secs,
            object_key: object_key.to_string(),
        })
    }

    /// Lists the logical names of every object under the prefix
    ///
    /// Folder placeholders (keys ending in `/`) are skipped. Backend order is kept.
    /// A failed listing is logged and yields an empty list.
    pub async fn list_available_objects(&self) -> Vec<String> {
        let listing_prefix = format!("{}{KEY_SEPARATOR}", self.images_prefix);

        match self.store.list_keys(&listing_prefix).await {
            Ok(keys) => keys
                .into_iter()
                .filter(|key| !key.ends_with(KEY_SEPARATOR))
                .map(|key| {
                    key.strip_prefix(&listing_prefix)
                        .map_or_else(|| key.clone(), ToString::to_string)
                })
                .collect(),
            Err(e) => {
                error!("Failed to list objects under {listing_prefix}: {e}");
                Vec::new()
            }
        }
    }
}
