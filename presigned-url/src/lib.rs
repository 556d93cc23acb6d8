//! Signed download URLs for objects stored in S3

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Command line surface
pub mod cli;

/// Object storage backends
pub mod object_store;

/// Signed URL generation and object listing
pub mod provider;

/// Console rendering
pub mod report;

/// Configuration and error types
pub mod types;
