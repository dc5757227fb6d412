//! Persisted document cache.
//!
//! A JSON map of name → last-known content under a mode-scoped key-value
//! entry, so content cached against one backend is invisible to the other.
//! Strictly a read optimization: a hit serves `read_through` without a
//! backend round trip, and every mutation path must call `put`,
//! `invalidate`, or `rekey` to keep entries honest. No eviction and no
//! capacity bound.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use markpad_core::{DocumentStore, KeyValueStore, Mode, Result};

pub struct DocumentCache {
    kv: Arc<dyn KeyValueStore>,
    /// Mode-scoped persistence key; entries never cross the mode boundary.
    key: &'static str,
}

impl DocumentCache {
    pub fn new(kv: Arc<dyn KeyValueStore>, mode: Mode) -> Self {
        Self {
            kv,
            key: mode.cache_key(),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match self.kv.get(self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(BTreeMap::new()),
        }
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let raw = serde_json::to_string(entries)?;
        self.kv.set(self.key, &raw)
    }

    /// Cached content for `name`, if present.
    pub fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(name).cloned())
    }

    /// Serve `name` from the cache, falling back to a backend read that
    /// populates the entry.
    pub async fn read_through(&self, store: &dyn DocumentStore, name: &str) -> Result<String> {
        if let Some(content) = self.get(name)? {
            debug!(filename = name, cache_hit = true, "document read");
            return Ok(content);
        }
        let content = store.read(name).await?;
        self.put(name, &content)?;
        debug!(filename = name, cache_hit = false, "document read");
        Ok(content)
    }

    pub fn put(&self, name: &str, content: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(name.to_string(), content.to_string());
        self.persist(&entries)
    }

    /// Drop the entry for `name`. Absent entries are fine.
    pub fn invalidate(&self, name: &str) -> Result<()> {
        let mut entries = self.load()?;
        if entries.remove(name).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    /// Move an entry to a new name, for renames. A missing source entry is
    /// not an error: the document may simply never have been read.
    pub fn rekey(&self, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        let mut entries = self.load()?;
        if let Some(content) = entries.remove(old) {
            entries.insert(new.to_string(), content);
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalStore;
    use crate::memory::MemoryKv;
    use markpad_core::WriteMode;

    fn fixtures() -> (Arc<MemoryKv>, DocumentCache, LocalStore) {
        let kv = Arc::new(MemoryKv::new());
        let cache = DocumentCache::new(kv.clone(), Mode::Unauth);
        let store = LocalStore::new(kv.clone());
        (kv, cache, store)
    }

    #[tokio::test]
    async fn test_miss_populates_from_backend() {
        let (_kv, cache, store) = fixtures();
        store.write("a.md", "# A", WriteMode::Create).await.unwrap();
        assert_eq!(cache.get("a.md").unwrap(), None);
        assert_eq!(cache.read_through(&store, "a.md").await.unwrap(), "# A");
        assert_eq!(cache.get("a.md").unwrap().as_deref(), Some("# A"));
    }

    #[tokio::test]
    async fn test_hit_skips_backend() {
        let (_kv, cache, store) = fixtures();
        // Entry present but backend empty: a hit must not read the backend.
        cache.put("a.md", "cached").unwrap();
        assert_eq!(cache.read_through(&store, "a.md").await.unwrap(), "cached");
    }

    #[tokio::test]
    async fn test_invalidate_forces_backend_read() {
        let (_kv, cache, store) = fixtures();
        store.write("a.md", "fresh", WriteMode::Create).await.unwrap();
        cache.put("a.md", "stale").unwrap();
        cache.invalidate("a.md").unwrap();
        assert_eq!(cache.read_through(&store, "a.md").await.unwrap(), "fresh");
    }

    #[test]
    fn test_invalidate_absent_entry_is_fine() {
        let (_kv, cache, _store) = fixtures();
        cache.invalidate("never-cached.md").unwrap();
    }

    #[test]
    fn test_rekey_moves_entry() {
        let (_kv, cache, _store) = fixtures();
        cache.put("old.md", "body").unwrap();
        cache.rekey("old.md", "new.md").unwrap();
        assert_eq!(cache.get("old.md").unwrap(), None);
        assert_eq!(cache.get("new.md").unwrap().as_deref(), Some("body"));
    }

    #[test]
    fn test_rekey_without_entry_is_fine() {
        let (_kv, cache, _store) = fixtures();
        cache.rekey("old.md", "new.md").unwrap();
        assert_eq!(cache.get("new.md").unwrap(), None);
    }

    #[test]
    fn test_caches_are_scoped_per_mode() {
        let kv = Arc::new(MemoryKv::new());
        let auth = DocumentCache::new(kv.clone(), Mode::Auth);
        let unauth = DocumentCache::new(kv, Mode::Unauth);
        auth.put("a.md", "auth copy").unwrap();
        assert_eq!(unauth.get("a.md").unwrap(), None);
        assert_eq!(auth.get("a.md").unwrap().as_deref(), Some("auth copy"));
    }
}
