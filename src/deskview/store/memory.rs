use super::{validate_key, KeyValueStore};
use crate::error::Result;
use serde_json::Value;
use std::collections::BTreeMap;

/// Map-backed store. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    entries: BTreeMap<String, Value>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.entries.remove(key).is_some())
    }
}
