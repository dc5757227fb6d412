//! In-memory key-value store, primarily for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use markpad_core::{Error, KeyValueStore, Result};

/// [`KeyValueStore`] over a process-local map. Cheap to construct, shared
/// through `Arc` when a test wires several components to one store.
#[derive(Debug, Default)]
pub struct MemoryKv {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self
            .inner
            .lock()
            .map_err(|_| Error::Storage("key-value store poisoned".to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self
            .inner
            .lock()
            .map_err(|_| Error::Storage("key-value store poisoned".to_string()))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self
            .inner
            .lock()
            .map_err(|_| Error::Storage("key-value store poisoned".to_string()))?;
        map.remove(key);
        Ok(())
    }
}
