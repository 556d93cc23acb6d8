//! In-memory object store for tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{BucketError, BucketResult, ObjectStore};

/// Object store holding a fixed set of keys and counting every call made to it
#[derive(Debug, Default)]
pub struct MockObjectStore {
    keys: Vec<String>,
    head_failure: Option<BucketError>,
    list_failure: Option<BucketError>,
    head_calls: AtomicUsize,
    presign_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl MockObjectStore {
    /// Creates a store containing `keys`, listed back in the given order
    #[must_use]
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Makes every existence check fail with `error`
    #[must_use]
    pub fn with_head_failure(mut self, error: BucketError) -> Self {
        self.head_failure = Some(error);
        self
    }

    /// Makes every listing fail with `error`
    #[must_use]
    pub fn with_list_failure(mut self, error: BucketError) -> Self {
        self.list_failure = Some(error);
        self
    }

    /// Number of existence checks issued so far
    #[must_use]
    pub fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    /// Number of presigning requests issued so far
    #[must_use]
    pub fn presign_calls(&self) -> usize {
        self.presign_calls.load(Ordering::SeqCst)
    }

    /// Number of listings issued so far
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn object_exists(&self, key: &str) -> BucketResult<bool> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.head_failure {
            return Err(error.clone());
        }
        Ok(self.keys.iter().any(|k| k == key))
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> BucketResult<String> {
        self.presign_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            "https://mock-bucket.invalid/{key}?X-Amz-Expires={}",
            expires_in.as_secs()
        ))
    }

    async fn list_keys(&self, prefix: &str) -> BucketResult<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.list_failure {
            return Err(error.clone());
        }
        Ok(self
            .keys
            .iter()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
