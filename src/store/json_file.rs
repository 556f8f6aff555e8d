//! Flat-file JSON storage backend
//!
//! Serializes the whole collection to disk after every mutation. Records are
//! kept in memory behind a `RwLock`; ids are monotonically increasing
//! integers rendered as strings.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;

use super::{Squirrel, SquirrelStore, StoreError};

#[derive(Debug, Serialize, Deserialize)]
struct StoreData {
    next_id: u64,
    squirrels: Vec<Squirrel>,
}

impl StoreData {
    const fn empty() -> Self {
        Self {
            next_id: 1,
            squirrels: Vec::new(),
        }
    }
}

/// File-backed squirrel store
pub struct JsonFileStore {
    path: PathBuf,
    data: RwLock<StoreData>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating an empty database file if none
    /// exists yet. Any other I/O failure is propagated.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let data = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let data = StoreData::empty();
                write_file(&path, &data).await?;
                data
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }
}

async fn write_file(path: &Path, data: &StoreData) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(data)?;
    fs::write(path, bytes).await?;
    Ok(())
}

#[async_trait]
impl SquirrelStore for JsonFileStore {
    async fn list(&self) -> Result<Vec<Squirrel>, StoreError> {
        let data = self.data.read().await;
        Ok(data.squirrels.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Squirrel>, StoreError> {
        let data = self.data.read().await;
        Ok(data.squirrels.iter().find(|s| s.id == id).cloned())
    }

    async fn create(&self, name: &str, size: &str) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        let id = data.next_id.to_string();
        data.next_id += 1;
        data.squirrels.push(Squirrel {
            id,
            name: name.to_string(),
            size: size.to_string(),
        });
        write_file(&self.path, &data).await
    }

    async fn update(&self, id: &str, name: &str, size: &str) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        let Some(squirrel) = data.squirrels.iter_mut().find(|s| s.id == id) else {
            // Unknown id: side-effect free, callers check existence first
            return Ok(());
        };
        squirrel.name = name.to_string();
        squirrel.size = size.to_string();
        write_file(&self.path, &data).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        let before = data.squirrels.len();
        data.squirrels.retain(|s| s.id != id);
        if data.squirrels.len() == before {
            return Ok(());
        }
        write_file(&self.path, &data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_temp_store() -> (tempfile::TempDir, JsonFileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("squirrels.json"))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn open_creates_empty_database_if_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("squirrels.json");
        assert!(!path.exists());

        let store = JsonFileStore::open(&path).await.unwrap();

        assert!(path.exists());
        assert_eq!(store.list().await.unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let (_dir, store) = open_temp_store().await;

        store.create("Fluffy", "large").await.unwrap();
        store.create("Chippy", "small").await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "1");
        assert_eq!(all[0].name, "Fluffy");
        assert_eq!(all[1].id, "2");
        assert_eq!(all[1].size, "small");
    }

    #[tokio::test]
    async fn get_returns_none_for_unknown_id() {
        let (_dir, store) = open_temp_store().await;
        store.create("Fluffy", "large").await.unwrap();

        assert!(store.get("999").await.unwrap().is_none());
        assert_eq!(store.get("1").await.unwrap().unwrap().name, "Fluffy");
    }

    #[tokio::test]
    async fn update_replaces_name_and_size() {
        let (_dir, store) = open_temp_store().await;
        store.create("Fluffy", "large").await.unwrap();

        store.update("1", "Nova", "medium").await.unwrap();

        let squirrel = store.get("1").await.unwrap().unwrap();
        assert_eq!(squirrel.name, "Nova");
        assert_eq!(squirrel.size, "medium");
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let (_dir, store) = open_temp_store().await;
        store.create("Fluffy", "large").await.unwrap();
        store.create("Chippy", "small").await.unwrap();

        store.delete("1").await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "2");
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("squirrels.json");

        {
            let store = JsonFileStore::open(&path).await.unwrap();
            store.create("Fluffy", "large").await.unwrap();
        }

        let store = JsonFileStore::open(&path).await.unwrap();
        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Fluffy");

        // id sequence continues after reopen
        store.create("Chippy", "small").await.unwrap();
        assert_eq!(store.list().await.unwrap()[1].id, "2");
    }
}
