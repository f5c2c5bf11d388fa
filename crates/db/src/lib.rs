//! Durable storage for service account requests.
//!
//! The whole collection lives in one JSON file under the data directory.
//! [`RequestStore`] is the handle (the equivalent of a connection pool);
//! repositories take it as their first argument.

use std::path::Path;

pub mod error;
pub mod models;
pub mod repositories;
pub mod store;

pub use error::StoreError;
pub use store::{RequestStore, REQUESTS_FILE_NAME, STORE_FORMAT_VERSION};

/// Open the request store rooted at `data_dir`, creating the directory if
/// needed.
pub async fn open_store(data_dir: impl AsRef<Path>) -> Result<RequestStore, StoreError> {
    RequestStore::open(data_dir.as_ref()).await
}

/// Verify the data directory accepts writes.
pub async fn health_check(store: &RequestStore) -> Result<(), StoreError> {
    store.check_writable().await
}
