//! In-memory storage backend
//!
//! Keeps documents in a map, the way a browser keeps values in
//! `localStorage`. Nothing survives the process.

use super::{StorageBackend, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Map-backed storage
#[derive(Debug, Default)]
pub struct InMemoryStorageBackend {
    documents: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryStorageBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(path: &str) -> String {
        path.trim_start_matches('/').to_string()
    }

    fn poisoned() -> StorageError {
        StorageError::BackendError("storage lock poisoned".to_string())
    }
}

#[async_trait(?Send)]
impl StorageBackend for InMemoryStorageBackend {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let documents = self.documents.read().map_err(|_| Self::poisoned())?;
        documents
            .get(&Self::key(path))
            .cloned()
            .ok_or_else(|| StorageError::FileNotFound(path.to_string()))
    }

    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        let mut documents = self.documents.write().map_err(|_| Self::poisoned())?;
        documents.insert(Self::key(path), content.to_vec());
        Ok(())
    }

    async fn file_exists(&self, path: &str) -> Result<bool, StorageError> {
        let documents = self.documents.read().map_err(|_| Self::poisoned())?;
        Ok(documents.contains_key(&Self::key(path)))
    }

    async fn delete_file(&self, path: &str) -> Result<(), StorageError> {
        let mut documents = self.documents.write().map_err(|_| Self::poisoned())?;
        documents
            .remove(&Self::key(path))
            .map(|_| ())
            .ok_or_else(|| StorageError::FileNotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_documents_round_trip() {
        let backend = InMemoryStorageBackend::new();
        backend.write_file("/session.json", b"{}").await.unwrap();

        assert!(backend.file_exists("session.json").await.unwrap());
        assert_eq!(backend.read_file("session.json").await.unwrap(), b"{}".to_vec());

        backend.delete_file("session.json").await.unwrap();
        assert!(!backend.file_exists("session.json").await.unwrap());
        assert!(matches!(
            backend.read_file("session.json").await,
            Err(StorageError::FileNotFound(_))
        ));
    }
}
