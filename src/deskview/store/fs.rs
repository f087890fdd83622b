use super::{validate_key, KeyValueStore};
use crate::error::{DeskError, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const BLOB_EXT: &str = "json";

/// Stores each key as `<root>/<key>.json`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.{}", key, BLOB_EXT)))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(DeskError::Io)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.blob_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(DeskError::Io)?;
        let value = serde_json::from_str(&content).map_err(DeskError::Serialization)?;
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let path = self.blob_path(key)?;
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(&value).map_err(DeskError::Serialization)?;

        // Write to a sibling then rename, so a crash never leaves half a blob.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(DeskError::Io)?;
        fs::rename(&tmp, &path).map_err(DeskError::Io)?;
        tracing::debug!(key, path = %path.display(), "wrote store blob");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let path = self.blob_path(key)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(DeskError::Io)?;
        Ok(true)
    }
}
