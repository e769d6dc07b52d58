//! Storage of asset metadata and projects.
//!
//! The engine only talks to [`AssetPersistence`]; backends live outside the
//! crate. [`MemoryPersistence`] keeps everything in process.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::{Asset, AssetMetadata, Project};

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Backend storing per-asset metadata and the project document.
#[allow(async_fn_in_trait)]
pub trait AssetPersistence {
    /// Stored metadata of an asset, or fresh metadata if it was never saved.
    async fn load_asset_metadata(&self, project: &Project, asset: &Asset) -> Result<AssetMetadata, PersistenceError>;

    async fn save_asset_metadata(&self, project: &Project, metadata: &AssetMetadata) -> Result<(), PersistenceError>;

    async fn save_project(&self, project: &Project) -> Result<(), PersistenceError>;

    /// Metadata of every asset that has been saved.
    async fn load_all_asset_metadata(&self, project: &Project) -> Result<Vec<AssetMetadata>, PersistenceError>;
}

/// In-memory backend. Documents are stored as JSON so loads hand out
/// independent copies.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    assets: RefCell<BTreeMap<String, String>>,
    project: RefCell<Option<String>>,
    asset_saves: Cell<usize>,
    project_saves: Cell<usize>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed stored metadata without counting it as a save.
    pub fn insert(&self, metadata: &AssetMetadata) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(metadata)?;
        self.assets.borrow_mut().insert(metadata.asset.id.clone(), json);
        Ok(())
    }

    /// Stored metadata of an asset, if any.
    pub fn stored(&self, asset_id: &str) -> Option<AssetMetadata> {
        self.assets
            .borrow()
            .get(asset_id)
            .and_then(|json| serde_json::from_str(json).ok())
    }

    /// Last saved project, if any.
    pub fn stored_project(&self) -> Option<Project> {
        self.project
            .borrow()
            .as_deref()
            .and_then(|json| serde_json::from_str(json).ok())
    }

    pub fn asset_save_count(&self) -> usize {
        self.asset_saves.get()
    }

    pub fn project_save_count(&self) -> usize {
        self.project_saves.get()
    }
}

impl AssetPersistence for MemoryPersistence {
    async fn load_asset_metadata(&self, _project: &Project, asset: &Asset) -> Result<AssetMetadata, PersistenceError> {
        match self.assets.borrow().get(&asset.id) {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(AssetMetadata::new(asset.clone())),
        }
    }

    async fn save_asset_metadata(&self, _project: &Project, metadata: &AssetMetadata) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(metadata)?;
        self.assets.borrow_mut().insert(metadata.asset.id.clone(), json);
        self.asset_saves.set(self.asset_saves.get() + 1);
        log::trace!("Stored metadata for {}", metadata.asset.id);
        Ok(())
    }

    async fn save_project(&self, project: &Project) -> Result<(), PersistenceError> {
        *self.project.borrow_mut() = Some(serde_json::to_string(project)?);
        self.project_saves.set(self.project_saves.get() + 1);
        Ok(())
    }

    async fn load_all_asset_metadata(&self, _project: &Project) -> Result<Vec<AssetMetadata>, PersistenceError> {
        self.assets
            .borrow()
            .values()
            .map(|json| serde_json::from_str(json).map_err(PersistenceError::from))
            .collect()
    }
}
