use super::{RecordStore, StoreError};
use crate::state::{new_state, Shared};
use async_trait::async_trait;
use std::collections::HashMap;

/// In-memory store, objects kept as raw bytes.
#[derive(Clone)]
pub struct MemoryRecordStore {
    objects: Shared<HashMap<String, Vec<u8>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self { objects: new_state(HashMap::new()) }
    }

    /// Store pre-seeded with one object
    pub fn with_object(key: &str, bytes: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store.objects.lock().insert(key.to_string(), bytes.into());
        store
    }

    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.objects.lock().contains_key(key))
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.objects
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.objects.lock().insert(key.to_string(), bytes);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
