pub mod azure;
pub mod memory;

pub use azure::AzureBlobStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

/// Capability surface of the object store. The pipeline only ever needs
/// these three operations; everything Azure-specific stays behind the trait
/// so tests run against [`MemoryStore`].
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Create the configured container if it does not exist yet. Safe to
    /// call on every submission.
    async fn ensure_container(&self) -> Result<(), StorageError>;

    /// Write one named object into the container.
    async fn put_object(
        &self,
        name: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Read an object back. `Ok(None)` when no object has that name.
    async fn fetch_object(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError>;
}

#[derive(Debug)]
pub struct StorageError {
    pub message: String,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for StorageError {
    fn from(message: String) -> Self {
        StorageError { message }
    }
}

impl From<&str> for StorageError {
    fn from(message: &str) -> Self {
        StorageError {
            message: message.to_string(),
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        StorageError {
            message: format!("Storage request failed: {err}"),
        }
    }
}
