//! # Storage Layer
//!
//! The dashboard keeps its state as JSON blobs under fixed keys, the way a
//! browser page uses local storage (`adminInfo` for the profile, one key per
//! list dataset). The [`KeyValueStore`] trait captures exactly that and
//! nothing more.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: one `<key>.json` file per key in a data directory
//! - [`memory::InMemoryStore`]: a map, for tests
//!
//! ## Storage Format
//!
//! ```text
//! $DESKVIEW_HOME/
//! ├── adminInfo.json      # cached admin profile
//! ├── drive.json          # Drive entries (JSON array)
//! ├── templates.json      # SMS templates
//! ├── documents.json      # technician documents
//! ├── projects.json       # technician projects
//! └── config.json         # DeskConfig (read by config.rs, not a store key)
//! ```
//!
//! Nothing is written implicitly: callers load at startup and save after a
//! mutation, so the process boundary is the only place state changes hands.

use crate::error::{DeskError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub mod fs;
pub mod memory;

pub const DRIVE_KEY: &str = "drive";
pub const TEMPLATES_KEY: &str = "templates";
pub const DOCUMENTS_KEY: &str = "documents";
pub const PROJECTS_KEY: &str = "projects";

/// Keys owned by a dataset or by the config file. A configurable key (the
/// profile cache) must not alias any of them.
pub const RESERVED_KEYS: &[&str] = &[
    DRIVE_KEY,
    TEMPLATES_KEY,
    DOCUMENTS_KEY,
    PROJECTS_KEY,
    "config",
];

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    /// Returns whether the key existed.
    fn remove(&mut self, key: &str) -> Result<bool>;

    /// Typed read. A stored blob that doesn't fit `T` is an error, not `None`.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key)? {
            Some(value) => Ok(Some(
                serde_json::from_value(value).map_err(DeskError::Serialization)?,
            )),
            None => Ok(None),
        }
    }

    fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_value(value).map_err(DeskError::Serialization)?;
        self.set(key, json)
    }
}

/// Keys double as file names, so they are restricted to `[A-Za-z0-9_-]`.
pub fn validate_key(key: &str) -> Result<()> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(DeskError::Store(format!("Invalid store key '{}'", key)))
    }
}

/// A key that is valid and not owned by a dataset.
pub fn validate_free_key(key: &str) -> Result<()> {
    validate_key(key)?;
    if RESERVED_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key)) {
        return Err(DeskError::Store(format!("Store key '{}' is reserved", key)));
    }
    Ok(())
}
