//! JSON document stores
//!
//! Each store owns one JSON document on a [`StorageBackend`]:
//! - [`WorkRecordStore`]: `work-records.json`, records keyed by id
//! - [`ConfigStore`]: `db-configs.json`, connection and spreadsheet configs keyed by name
//! - [`SessionStore`]: `session.json`, the current working selection
//!
//! A missing document reads as empty. So does an unreadable one, with a
//! warning, so a damaged file never blocks new saves.

pub mod configs;
pub mod session;
pub mod work_records;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::export::GenerateError;
use crate::storage::{StorageBackend, StorageError};

pub use configs::ConfigStore;
pub use session::{SessionState, SessionStore};
pub use work_records::WorkRecordStore;

/// Errors from the document stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Work record not found: {0}")]
    RecordNotFound(String),

    #[error("Config not found: {0}")]
    ConfigNotFound(String),

    #[error("Config {name} is a {found} config, not {expected}")]
    ConfigKindMismatch {
        name: String,
        found: &'static str,
        expected: &'static str,
    },

    #[error("Invalid update: {0}")]
    InvalidUpdate(String),

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read a document holding a JSON object
pub(crate) async fn load_object<B: StorageBackend>(
    backend: &B,
    path: &str,
) -> StoreResult<Map<String, Value>> {
    let bytes = match backend.read_file(path).await {
        Ok(bytes) => bytes,
        Err(StorageError::FileNotFound(_)) => return Ok(Map::new()),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => {
            warn!("{} does not hold a JSON object, treating it as empty", path);
            Ok(Map::new())
        }
        Err(e) => {
            warn!("{} is unreadable ({}), treating it as empty", path, e);
            Ok(Map::new())
        }
    }
}

/// Replace a document with a pretty-printed JSON object
pub(crate) async fn save_object<B: StorageBackend>(
    backend: &B,
    path: &str,
    object: &Map<String, Value>,
) -> StoreResult<()> {
    let content = serde_json::to_vec_pretty(object)?;
    backend.write_file(path, &content).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorageBackend;

    #[tokio::test]
    async fn test_missing_and_corrupt_documents_read_empty() {
        let backend = InMemoryStorageBackend::new();
        assert!(load_object(&backend, "a.json").await.unwrap().is_empty());

        backend.write_file("a.json", b"{ not json").await.unwrap();
        assert!(load_object(&backend, "a.json").await.unwrap().is_empty());

        backend.write_file("a.json", b"[1, 2]").await.unwrap();
        assert!(load_object(&backend, "a.json").await.unwrap().is_empty());
    }
}
