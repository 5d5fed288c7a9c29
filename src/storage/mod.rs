//! Storage backend abstraction
//!
//! The stores read and write whole JSON documents through [`StorageBackend`]:
//! - `FileSystemStorageBackend`: files under a base directory (native apps, CLI)
//! - `InMemoryStorageBackend`: a keyed map (tests, embedding)

use async_trait::async_trait;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Storage backend error: {0}")]
    BackendError(String),
}

/// Whole-document storage keyed by relative path
#[async_trait(?Send)]
pub trait StorageBackend: Send + Sync {
    /// Read a document. A missing document is [`StorageError::FileNotFound`].
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Create or replace a document
    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError>;

    async fn file_exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Remove a document. A missing document is [`StorageError::FileNotFound`].
    async fn delete_file(&self, path: &str) -> Result<(), StorageError>;
}

/// Lets several stores share one backend
#[async_trait(?Send)]
impl<T: StorageBackend + ?Sized> StorageBackend for std::sync::Arc<T> {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        (**self).read_file(path).await
    }

    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        (**self).write_file(path, content).await
    }

    async fn file_exists(&self, path: &str) -> Result<bool, StorageError> {
        (**self).file_exists(path).await
    }

    async fn delete_file(&self, path: &str) -> Result<(), StorageError> {
        (**self).delete_file(path).await
    }
}

#[cfg(feature = "native-fs")]
pub mod filesystem;

pub mod memory;

#[cfg(feature = "native-fs")]
pub use filesystem::FileSystemStorageBackend;
pub use memory::InMemoryStorageBackend;
