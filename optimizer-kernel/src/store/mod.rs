/**
 * RECORD STORE - Single-object blob store holding the server inventory
 *
 * ROLE :
 * Reads and writes the raw JSON blob of server records at a named location,
 * and reports whether that location exists. No business logic lives here.
 *
 * HOW IT WORKS :
 * - RecordStore trait = the three capabilities the service needs (exists/fetch/store)
 * - store() replaces the whole object; "append" is done by the caller
 * - Backends: filesystem (default), in-memory (tests/devkit), S3 (feature "s3")
 *
 * Writers are last-write-wins. A conditional-write backend can be plugged in
 * behind the same trait without touching the evaluator.
 */

pub mod fs;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;
use std::sync::Arc;

pub use fs::FsRecordStore;
pub use memory::MemoryRecordStore;

/// Failures a store operation can report
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Not-found is `Ok(false)`; anything else that goes wrong is an error.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Overwrites any previous content at `key`.
    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError>;

    /// Short backend name for health reporting
    fn backend(&self) -> &'static str;
}

pub type SharedStore = Arc<dyn RecordStore>;
