//! File system storage backend
//!
//! Documents live as files under a base directory. Writes go to a sibling
//! temporary file first and are renamed into place, so a crash mid-write
//! leaves the previous document intact.
//!
//! ## Security
//!
//! Paths are relative to the base directory. Any `..` component is rejected,
//! and paths whose existing parent resolves outside the base are refused.

use super::{StorageBackend, StorageError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File system storage backend
#[derive(Debug, Clone)]
pub struct FileSystemStorageBackend {
    base_path: PathBuf,
}

impl FileSystemStorageBackend {
    /// Create a backend rooted at `base_path`.
    ///
    /// The directory is created on first write.
    ///
    /// ```rust
    /// use sheet_sql_sdk::storage::FileSystemStorageBackend;
    ///
    /// let backend = FileSystemStorageBackend::new("/var/lib/sheet-sql");
    /// assert!(backend.base_path().ends_with("sheet-sql"));
    /// ```
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn resolve_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path.trim_start_matches('/'));

        if relative.as_os_str().is_empty() {
            return Err(StorageError::PermissionDenied("Empty path".to_string()));
        }
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(StorageError::PermissionDenied(format!(
                "Path escapes base directory: {}",
                path
            )));
        }

        let full = self.base_path.join(relative);

        // A symlinked parent may still point outside the base
        if let (Some(parent), Ok(base)) = (full.parent(), self.base_path.canonicalize())
            && let Ok(parent) = parent.canonicalize()
            && !parent.starts_with(&base)
        {
            return Err(StorageError::PermissionDenied(format!(
                "Path escapes base directory: {}",
                path
            )));
        }

        Ok(full)
    }
}

fn io_error(action: &str, path: &str, e: std::io::Error) -> StorageError {
    if e.kind() == ErrorKind::NotFound {
        StorageError::FileNotFound(path.to_string())
    } else {
        StorageError::IoError(format!("Failed to {} {}: {}", action, path, e))
    }
}

#[async_trait(?Send)]
impl StorageBackend for FileSystemStorageBackend {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full_path = self.resolve_path(path)?;
        fs::read(&full_path).await.map_err(|e| io_error("read", path, e))
    }

    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        let full_path = self.resolve_path(path)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create directory for", path, e))?;
        }

        let mut staging = full_path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        fs::write(&staging, content)
            .await
            .map_err(|e| io_error("write", path, e))?;
        if let Err(e) = fs::rename(&staging, &full_path).await {
            if let Err(cleanup) = fs::remove_file(&staging).await {
                debug!("Could not remove {}: {}", staging.display(), cleanup);
            }
            return Err(io_error("replace", path, e));
        }

        debug!("Wrote {} bytes to {}", content.len(), full_path.display());
        Ok(())
    }

    async fn file_exists(&self, path: &str) -> Result<bool, StorageError> {
        let full_path = self.resolve_path(path)?;
        match fs::metadata(&full_path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error("stat", path, e)),
        }
    }

    async fn delete_file(&self, path: &str) -> Result<(), StorageError> {
        let full_path = self.resolve_path(path)?;
        fs::remove_file(&full_path)
            .await
            .map_err(|e| io_error("delete", path, e))
    }
}
