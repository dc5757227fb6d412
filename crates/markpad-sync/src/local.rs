//! Local document store for unauth mode.
//!
//! All documents live in one JSON map persisted under a single key-value
//! entry, mirroring how a browser profile would hold them. Operations never
//! touch the network and never raise transport or auth errors.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use markpad_core::{
    defaults, Document, DocumentStore, Error, KeyValueStore, Result, WriteMode,
};

/// [`DocumentStore`] backed by an injected [`KeyValueStore`].
///
/// The map is loaded and re-persisted around every mutation; a `BTreeMap`
/// keeps `list` order stable (sorted by name) across reloads.
pub struct LocalStore {
    kv: Arc<dyn KeyValueStore>,
}

impl LocalStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match self.kv.get(defaults::UNAUTH_FILES_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(BTreeMap::new()),
        }
    }

    fn persist(&self, docs: &BTreeMap<String, String>) -> Result<()> {
        let raw = serde_json::to_string(docs)?;
        self.kv.set(defaults::UNAUTH_FILES_KEY, &raw)
    }
}

#[async_trait]
impl DocumentStore for LocalStore {
    async fn list(&self) -> Result<Vec<String>> {
        let docs = self.load()?;
        debug!(subsystem = "local", result_count = docs.len(), "listed documents");
        Ok(docs.keys().cloned().collect())
    }

    async fn read(&self, name: &str) -> Result<String> {
        let docs = self.load()?;
        docs.get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    async fn write(&self, name: &str, content: &str, mode: WriteMode) -> Result<()> {
        let mut docs = self.load()?;
        match mode {
            WriteMode::Create if docs.contains_key(name) => {
                return Err(Error::AlreadyExists(name.to_string()));
            }
            WriteMode::Update if !docs.contains_key(name) => {
                return Err(Error::NotFound(name.to_string()));
            }
            _ => {}
        }
        docs.insert(name.to_string(), content.to_string());
        self.persist(&docs)?;
        info!(subsystem = "local", op = "write", filename = name, "document written");
        Ok(())
    }

    async fn rename(&self, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        let mut docs = self.load()?;
        if docs.contains_key(new) {
            return Err(Error::AlreadyExists(new.to_string()));
        }
        let content = docs
            .remove(old)
            .ok_or_else(|| Error::NotFound(old.to_string()))?;
        docs.insert(new.to_string(), content);
        self.persist(&docs)?;
        info!(
            subsystem = "local",
            op = "rename",
            filename = old,
            new_filename = new,
            "document renamed"
        );
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        let mut docs = self.load()?;
        if docs.remove(name).is_none() {
            return Err(Error::NotFound(name.to_string()));
        }
        self.persist(&docs)?;
        info!(subsystem = "local", op = "remove", filename = name, "document removed");
        Ok(())
    }

    async fn download(&self, name: &str) -> Result<Document> {
        let content = self.read(name).await?;
        Ok(Document::new(name, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryKv;

    fn store() -> LocalStore {
        LocalStore::new(Arc::new(MemoryKv::new()))
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let s = store();
        assert!(s.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let s = store();
        s.write("a.md", "# A", WriteMode::Create).await.unwrap();
        assert_eq!(s.read("a.md").await.unwrap(), "# A");
    }

    #[tokio::test]
    async fn test_create_collision() {
        let s = store();
        s.write("a.md", "one", WriteMode::Create).await.unwrap();
        let err = s.write("a.md", "two", WriteMode::Create).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(name) if name == "a.md"));
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let s = store();
        let err = s.write("a.md", "x", WriteMode::Update).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let s = store();
        s.write("c.md", "", WriteMode::Create).await.unwrap();
        s.write("a.md", "", WriteMode::Create).await.unwrap();
        s.write("b.md", "", WriteMode::Create).await.unwrap();
        assert_eq!(s.list().await.unwrap(), vec!["a.md", "b.md", "c.md"]);
    }

    #[tokio::test]
    async fn test_rename_moves_content() {
        let s = store();
        s.write("a.md", "# A", WriteMode::Create).await.unwrap();
        s.rename("a.md", "b.md").await.unwrap();
        assert!(matches!(s.read("a.md").await, Err(Error::NotFound(_))));
        assert_eq!(s.read("b.md").await.unwrap(), "# A");
    }

    #[tokio::test]
    async fn test_rename_collision() {
        let s = store();
        s.write("a.md", "", WriteMode::Create).await.unwrap();
        s.write("b.md", "", WriteMode::Create).await.unwrap();
        let err = s.rename("a.md", "b.md").await.unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_rename_same_name_is_noop() {
        let s = store();
        s.write("a.md", "# A", WriteMode::Create).await.unwrap();
        s.rename("a.md", "a.md").await.unwrap();
        assert_eq!(s.read("a.md").await.unwrap(), "# A");
    }

    #[tokio::test]
    async fn test_remove_missing_document() {
        let s = store();
        assert!(matches!(s.remove("a.md").await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_download_uses_stored_name() {
        let s = store();
        s.write("a.md", "# A", WriteMode::Create).await.unwrap();
        let doc = s.download("a.md").await.unwrap();
        assert_eq!(doc.name, "a.md");
        assert_eq!(doc.content, "# A");
    }

    #[tokio::test]
    async fn test_survives_reload_from_same_kv() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKv::new());
        {
            let s = LocalStore::new(kv.clone());
            s.write("a.md", "# A", WriteMode::Create).await.unwrap();
        }
        let s = LocalStore::new(kv);
        assert_eq!(s.read("a.md").await.unwrap(), "# A");
    }
}
