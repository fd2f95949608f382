use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::model::BoxRecord;

/// Errors raised by a box store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistence for the whole box collection
#[async_trait]
pub trait BoxStore: Send + Sync {
    /// Create an empty collection if none exists yet
    async fn ensure_initialized(&self) -> Result<(), StoreError>;

    /// Load the full collection in stored order
    async fn read_all(&self) -> Result<Vec<BoxRecord>, StoreError>;

    /// Replace the full collection
    async fn write_all(&self, boxes: &[BoxRecord]) -> Result<(), StoreError>;
}

/// Collection kept as a single pretty-printed JSON array on disk.
///
/// Writes overwrite the file in place. There is no locking, so two concurrent
/// read-modify-write sequences can lose an update.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn parse_error(&self, source: serde_json::Error) -> StoreError {
        StoreError::Parse {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl BoxStore for JsonFileStore {
    async fn ensure_initialized(&self) -> Result<(), StoreError> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        if exists {
            return Ok(());
        }

        tokio::fs::write(&self.path, "[]")
            .await
            .map_err(|e| self.io_error(e))?;
        tracing::info!("Created empty box collection at {}", self.path.display());
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<BoxRecord>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        // A literal `null` document reads as an empty collection
        let boxes: Option<Vec<BoxRecord>> =
            serde_json::from_str(&content).map_err(|e| self.parse_error(e))?;
        Ok(boxes.unwrap_or_default())
    }

    async fn write_all(&self, boxes: &[BoxRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(boxes).map_err(|e| self.parse_error(e))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.io_error(e))
    }
}
