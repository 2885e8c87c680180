//! Storage abstraction for persistence.
//!
//! The editor persists one opaque blob: `{ scene, viewport }`.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::scene::{SceneData, SceneError};
use crate::viewport::Viewport;
use serde::Serialize;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

impl From<SceneError> for StorageError {
    fn from(e: SceneError) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Synchronous key-value store for string blobs.
pub trait BlobStore {
    /// Load a blob; `Ok(None)` when the key was never written.
    fn load(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a blob, replacing any previous value.
    fn save(&self, key: &str, blob: &str) -> StorageResult<()>;

    /// Delete a blob. Missing keys are not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Everything the editor persists between sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistedState {
    pub scene: SceneData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
}

impl PersistedState {
    pub fn to_json(&self) -> StorageResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a blob. A missing scene yields an empty one; an unreadable
    /// viewport is ignored.
    pub fn from_json(json: &str) -> StorageResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let scene = match value.get("scene") {
            Some(scene) => SceneData::from_value(scene.clone())?,
            None => SceneData::default(),
        };
        let viewport = value
            .get("viewport")
            .and_then(|v| serde_json::from_value::<Viewport>(v.clone()).ok());
        Ok(Self { scene, viewport })
    }
}
