use std::sync::Arc;

use tracing::{error, info};

use crate::model::{BoxRecord, NewBox};
use crate::store::{BoxStore, StoreError};

/// Box collection operations on top of a store.
///
/// Reads never fail: any store error is logged and treated as an empty
/// collection. Write errors are logged and returned to the caller.
pub struct BoxService {
    store: Arc<dyn BoxStore>,
}

impl BoxService {
    /// Create the service, making sure the backing collection exists
    pub async fn open(store: Arc<dyn BoxStore>) -> Result<Self, StoreError> {
        store.ensure_initialized().await?;
        Ok(Self { store })
    }

    /// Current collection in stored order
    pub async fn list(&self) -> Vec<BoxRecord> {
        if let Err(e) = self.store.ensure_initialized().await {
            error!("Error initializing box collection: {}", e);
            return Vec::new();
        }

        match self.store.read_all().await {
            Ok(boxes) => boxes,
            Err(e) => {
                error!("Error reading boxes: {}", e);
                Vec::new()
            }
        }
    }

    /// Append a new box with a server-assigned id and persist the collection
    pub async fn add(&self, new: NewBox) -> Result<BoxRecord, StoreError> {
        let record = BoxRecord::from_new(new);

        let mut boxes = self.list().await;
        boxes.push(record.clone());

        if let Err(e) = self.store.write_all(&boxes).await {
            error!("Error saving box {}: {}", record.id, e);
            return Err(e);
        }

        info!("Added box {} ({} total)", record.id, boxes.len());
        Ok(record)
    }

    /// Replace the collection with an empty one
    pub async fn clear_all(&self) -> Result<(), StoreError> {
        if let Err(e) = self.store.write_all(&[]).await {
            error!("Error clearing boxes: {}", e);
            return Err(e);
        }

        info!("Cleared all boxes");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonFileStore;
    use async_trait::async_trait;
    use std::path::PathBuf;

    /// Store whose writes always fail
    struct ReadOnlyStore;

    #[async_trait]
    impl BoxStore for ReadOnlyStore {
        async fn ensure_initialized(&self) -> Result<(), StoreError> {
            Ok(())
        }

        async fn read_all(&self) -> Result<Vec<BoxRecord>, StoreError> {
            Ok(vec![BoxRecord::from_new(NewBox::new(0, 0, "grey"))])
        }

        async fn write_all(&self, _boxes: &[BoxRecord]) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: PathBuf::from("read-only"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    async fn open_in(dir: &tempfile::TempDir) -> (BoxService, PathBuf) {
        let path = dir.path().join("boxes.json");
        let service = BoxService::open(Arc::new(JsonFileStore::new(&path)))
            .await
            .unwrap();
        (service, path)
    }

    #[tokio::test]
    async fn test_list_missing_file_creates_it() {
        let dir = tempfile::tempdir().unwrap();
        let (service, path) = open_in(&dir).await;
        std::fs::remove_file(&path).unwrap();

        assert!(service.list().await.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = open_in(&dir).await;

        let created = service.add(NewBox::new(1, 2, "red")).await.unwrap();
        let boxes = service.list().await;

        assert_eq!(boxes, vec![created.clone()]);
        assert_eq!((created.x, created.y), (1, 2));
        assert_eq!(created.color, "red");
        assert!(!created.id.is_nil());
    }

    #[tokio::test]
    async fn test_add_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = open_in(&dir).await;

        let a = service.add(NewBox::new(1, 1, "a")).await.unwrap();
        let b = service.add(NewBox::new(2, 2, "b")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(service.list().await, vec![a, b]);
    }

    #[tokio::test]
    async fn test_clear_all() {
        let dir = tempfile::tempdir().unwrap();
        let (service, path) = open_in(&dir).await;
        service.add(NewBox::new(1, 1, "a")).await.unwrap();
        service.add(NewBox::new(2, 2, "b")).await.unwrap();

        service.clear_all().await.unwrap();

        assert!(service.list().await.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_corrupt_file_lists_empty_and_is_overwritten_by_add() {
        let dir = tempfile::tempdir().unwrap();
        let (service, path) = open_in(&dir).await;
        std::fs::write(&path, "garbage").unwrap();

        assert!(service.list().await.is_empty());

        let created = service.add(NewBox::new(5, 6, "teal")).await.unwrap();
        assert_eq!(service.list().await, vec![created]);
    }

    #[tokio::test]
    async fn test_add_keeps_records_with_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let (service, path) = open_in(&dir).await;
        std::fs::write(
            &path,
            r#"[{"id":"00000000-0000-0000-0000-000000000001","x":1,"y":2,"color":"red"},{"id":"00000000-0000-0000-0000-000000000002","x":3,"y":4}]"#,
        )
        .unwrap();

        assert_eq!(service.list().await.len(), 2);

        let created = service.add(NewBox::new(9, 9, "new")).await.unwrap();
        let boxes = service.list().await;
        assert_eq!(boxes.len(), 3);
        assert_eq!(boxes[0].color, "red");
        assert_eq!(boxes[1].id.to_string(), "00000000-0000-0000-0000-000000000002");
        assert_eq!(boxes[2], created);
    }

    #[tokio::test]
    async fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("boxes.json");
        let store = Arc::new(JsonFileStore::new(&path));

        assert!(BoxService::open(store.clone()).await.is_err());

        let service = BoxService { store };
        assert!(service.list().await.is_empty());
        assert!(service.add(NewBox::new(1, 2, "red")).await.is_err());
        assert!(service.clear_all().await.is_err());
    }

    #[tokio::test]
    async fn test_write_failure_is_returned() {
        let service = BoxService::open(Arc::new(ReadOnlyStore)).await.unwrap();

        assert_eq!(service.list().await.len(), 1);
        let err = service.add(NewBox::new(1, 2, "red")).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(service.clear_all().await.is_err());
    }
}
