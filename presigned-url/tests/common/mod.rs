// Not every helper is used in every test, so we allow dead code
#![allow(dead_code)]

mod fake_s3;
pub use fake_s3::*;

use std::sync::Arc;

use presigned_url::{
    object_store::mock::MockObjectStore, provider::SignedUrlProvider, types::StorageConfig,
};

/// Configuration matching the defaults a fresh checkout would run with
pub fn test_config() -> StorageConfig {
    StorageConfig {
        bucket_name: "b".to_string(),
        images_prefix: "images".to_string(),
        presigned_url_expiration_secs: 3600,
        region: "ap-southeast-2".to_string(),
        endpoint_url: None,
    }
}

/// Provider over `store`, returning the store handle so call counts can be inspected
pub fn provider_with(store: MockObjectStore) -> (SignedUrlProvider, Arc<MockObjectStore>) {
    let store = Arc::new(store);
    let provider = SignedUrlProvider::new(store.clone(), &test_config());
    (provider, store)
}
