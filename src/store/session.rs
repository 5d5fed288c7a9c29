//! Working-session state
//!
//! The connection, the introspected tables and the selected table survive
//! restarts: every setter writes the whole state through to `session.json`.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::StoreResult;
use crate::models::{DbConfig, TableDescriptor};
use crate::storage::{StorageBackend, StorageError};

/// Document holding the session state
pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub db_config: Option<DbConfig>,
    /// Table descriptors from the last introspection
    #[serde(default)]
    pub db_tables: Vec<TableDescriptor>,
    /// Name of the selected target table
    #[serde(default)]
    pub selected_table: Option<String>,
}

impl SessionState {
    /// Descriptor of the selected table, if it is among `db_tables`
    pub fn selected_descriptor(&self) -> Option<&TableDescriptor> {
        let name = self.selected_table.as_deref()?;
        self.db_tables.iter().find(|t| t.name == name)
    }
}

/// Session state mirrored to storage
pub struct SessionStore<B> {
    backend: B,
    state: SessionState,
}

impl<B: StorageBackend> SessionStore<B> {
    /// Open the session, restoring any saved state.
    ///
    /// Missing or unreadable state starts an empty session.
    pub async fn open(backend: B) -> StoreResult<Self> {
        let state = match backend.read_file(SESSION_FILE).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!("{} is unreadable ({}), starting a new session", SESSION_FILE, e);
                SessionState::default()
            }),
            Err(StorageError::FileNotFound(_)) => SessionState::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { backend, state })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub async fn set_db_config(&mut self, config: Option<DbConfig>) -> StoreResult<()> {
        self.state.db_config = config;
        self.persist().await
    }

    pub async fn set_db_tables(&mut self, tables: Vec<TableDescriptor>) -> StoreResult<()> {
        self.state.db_tables = tables;
        self.persist().await
    }

    pub async fn set_selected_table(&mut self, table: Option<String>) -> StoreResult<()> {
        self.state.selected_table = table;
        self.persist().await
    }

    /// Reset to an empty session and drop the saved state
    pub async fn clear(&mut self) -> StoreResult<()> {
        self.state = SessionState::default();
        match self.backend.delete_file(SESSION_FILE).await {
            Ok(()) | Err(StorageError::FileNotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }
        info!("Cleared session state");
        Ok(())
    }

    async fn persist(&self) -> StoreResult<()> {
        let content = serde_json::to_vec_pretty(&self.state)?;
        self.backend.write_file(SESSION_FILE, &content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnDescriptor, DatabaseKind};
    use crate::storage::InMemoryStorageBackend;
    use std::sync::Arc;

    fn pg() -> DbConfig {
        DbConfig {
            kind: DatabaseKind::Postgresql,
            host: "db".to_string(),
            port: 5432,
            database: "app".to_string(),
            username: "app".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_state_written_through() {
        let backend = Arc::new(InMemoryStorageBackend::new());
        let mut session = SessionStore::open(backend.clone()).await.unwrap();
        assert_eq!(session.state(), &SessionState::default());

        session.set_db_config(Some(pg())).await.unwrap();
        session
            .set_db_tables(vec![TableDescriptor::new(
                "users",
                vec![ColumnDescriptor::new("id", "int").with_primary(true)],
            )])
            .await
            .unwrap();
        session.set_selected_table(Some("users".to_string())).await.unwrap();

        let reopened = SessionStore::open(backend.clone()).await.unwrap();
        assert_eq!(reopened.state(), session.state());
        assert_eq!(
            reopened.state().selected_descriptor().map(|t| t.name.as_str()),
            Some("users")
        );
    }

    #[tokio::test]
    async fn test_clear() {
        let backend = Arc::new(InMemoryStorageBackend::new());
        let mut session = SessionStore::open(backend.clone()).await.unwrap();
        session.set_selected_table(Some("users".to_string())).await.unwrap();

        session.clear().await.unwrap();
        assert_eq!(session.state(), &SessionState::default());
        assert!(!backend.file_exists(SESSION_FILE).await.unwrap());

        // Clearing twice is fine
        session.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_state_starts_empty() {
        let backend = InMemoryStorageBackend::new();
        backend.write_file(SESSION_FILE, b"nope").await.unwrap();
        let session = SessionStore::open(backend).await.unwrap();
        assert_eq!(session.state(), &SessionState::default());
    }
}
