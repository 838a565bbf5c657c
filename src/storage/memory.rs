use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;

use super::{BlobStore, StorageError};

/// Object contents plus the content type it was uploaded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// In-process store used by the test suite in place of a live blob service.
/// Uploads against a container that was never created fail, the same way the
/// real service would answer 404.
#[derive(Debug, Default)]
pub struct MemoryStore {
    container_ready: AtomicBool,
    objects: DashMap<String, StoredObject>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn object_names(&self) -> Vec<String> {
        self.objects.iter().map(|e| e.key().clone()).collect()
    }

    pub fn object(&self, name: &str) -> Option<StoredObject> {
        self.objects.get(name).map(|e| e.value().clone())
    }
}

#[async_trait::async_trait]
impl BlobStore for MemoryStore {
    async fn ensure_container(&self) -> Result<(), StorageError> {
        self.container_ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn put_object(
        &self,
        name: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        if !self.container_ready.load(Ordering::SeqCst) {
            return Err(StorageError::from("Container has not been created"));
        }
        self.objects.insert(
            name.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                bytes: body,
            },
        );
        Ok(())
    }

    async fn fetch_object(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.objects.get(name).map(|e| e.value().bytes.clone()))
    }
}
