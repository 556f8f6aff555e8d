//! Storage collaborator module
//!
//! Owns the squirrel records: the router never caches or mutates a record
//! directly, it always round-trips through the operations defined here.

mod json_file;

pub use json_file::JsonFileStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single squirrel record. The id is assigned by the store on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Squirrel {
    pub id: String,
    pub name: String,
    pub size: String,
}

/// Errors surfaced by storage implementations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence contract consumed by the request handlers.
///
/// `list` returns records in insertion order; the three mutating operations
/// are side-effect only. Callers are expected to check existence with `get`
/// before `update` or `delete`.
#[async_trait]
pub trait SquirrelStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Squirrel>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Squirrel>, StoreError>;

    async fn create(&self, name: &str, size: &str) -> Result<(), StoreError>;

    async fn update(&self, id: &str, name: &str, size: &str) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
