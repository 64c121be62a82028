//! Named model storage
//!
//! A [`ModelStore`] maps names to opaque blobs. [`DirModelStore`] keeps
//! one file per name in a directory; [`MemoryModelStore`] keeps blobs in
//! a map and is mainly useful in tests.

use crate::svm::LinearSvm;
use crate::{RecogError, RecogResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Named opaque blob storage
pub trait ModelStore {
    /// Fetch the blob stored under `name`.
    ///
    /// Returns [`RecogError::ModelLoad`] if no such blob exists.
    fn get(&self, name: &str) -> RecogResult<Vec<u8>>;

    /// Store `blob` under `name`, replacing any previous blob.
    fn put(&mut self, name: &str, blob: &[u8]) -> RecogResult<()>;
}

/// Serialize `model` and store it under `name`.
pub fn save_model(store: &mut dyn ModelStore, name: &str, model: &LinearSvm) -> RecogResult<()> {
    let blob = model.write_to_bytes()?;
    store.put(name, &blob)?;
    info!(name, bytes = blob.len(), "model stored");
    Ok(())
}

/// Load and decode the model stored under `name`.
///
/// # Errors
///
/// Returns [`RecogError::ModelLoad`] naming the model if it is absent
/// or corrupt.
pub fn load_model(store: &dyn ModelStore, name: &str) -> RecogResult<LinearSvm> {
    let blob = store.get(name)?;
    let model = LinearSvm::read_from_bytes(&blob).map_err(|e| match e {
        RecogError::ModelLoad { message, .. } => RecogError::ModelLoad {
            name: name.to_string(),
            message,
        },
        other => other,
    })?;
    info!(name, classes = model.labels().len(), "model loaded");
    Ok(model)
}

/// Store keeping one file per model under a directory
#[derive(Debug, Clone)]
pub struct DirModelStore {
    root: PathBuf,
}

impl DirModelStore {
    /// Create a store rooted at `root`; the directory is created on the
    /// first `put`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the model files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file for `name`.
    pub fn path_for(&self, name: &str) -> RecogResult<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(RecogError::InvalidParameter(format!(
                "invalid model name: '{name}'"
            )));
        }
        Ok(self.root.join(name))
    }
}

impl ModelStore for DirModelStore {
    fn get(&self, name: &str) -> RecogResult<Vec<u8>> {
        let path = self.path_for(name)?;
        fs::read(&path).map_err(|e| RecogError::ModelLoad {
            name: name.to_string(),
            message: format!("{}: {e}", path.display()),
        })
    }

    fn put(&mut self, name: &str, blob: &[u8]) -> RecogResult<()> {
        let path = self.path_for(name)?;
        let io_err = |e: std::io::Error| RecogError::Io {
            path: path.clone(),
            message: e.to_string(),
        };
        fs::create_dir_all(&self.root).map_err(io_err)?;
        fs::write(&path, blob).map_err(io_err)
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryModelStore {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryModelStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Check whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl ModelStore for MemoryModelStore {
    fn get(&self, name: &str) -> RecogResult<Vec<u8>> {
        self.blobs
            .get(name)
            .cloned()
            .ok_or_else(|| RecogError::ModelLoad {
                name: name.to_string(),
                message: "no such model".to_string(),
            })
    }

    fn put(&mut self, name: &str, blob: &[u8]) -> RecogResult<()> {
        self.blobs.insert(name.to_string(), blob.to_vec());
        Ok(())
    }
}
