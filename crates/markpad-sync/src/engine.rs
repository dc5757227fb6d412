//! Sync engine: orchestrates document operations across the cache and the
//! active backend.
//!
//! The backend is selected once at construction; the engine never branches
//! on which one is active. Switching modes is a hard boundary handled by
//! constructing a new engine against the other adapter.

use std::sync::Arc;

use tracing::{debug, info};

use markpad_core::{
    defaults, ensure_markdown_extension, rewrite_to_markdown_extension, validate_filename,
    Document, DocumentStore, Error, KeyValueStore, Mode, Result, WriteMode,
};

use crate::cache::DocumentCache;

/// What the editor should be showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    /// No open document; the UI renders its placeholder.
    Empty,
    Document {
        name: String,
        content: String,
        unsaved: bool,
    },
}

impl EditorState {
    /// Name of the open document, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            EditorState::Empty => None,
            EditorState::Document { name, .. } => Some(name),
        }
    }
}

pub struct SyncEngine {
    store: Arc<dyn DocumentStore>,
    cache: DocumentCache,
    kv: Arc<dyn KeyValueStore>,
    names: Vec<String>,
    current: EditorState,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn DocumentStore>, kv: Arc<dyn KeyValueStore>, mode: Mode) -> Self {
        Self {
            store,
            cache: DocumentCache::new(kv.clone(), mode),
            kv,
            names: Vec::new(),
            current: EditorState::Empty,
        }
    }

    /// Known document names, in backend order.
    pub fn documents(&self) -> &[String] {
        &self.names
    }

    pub fn current(&self) -> &EditorState {
        &self.current
    }

    fn set_pointer(&self, name: &str) -> Result<()> {
        self.kv.set(defaults::CURRENT_FILE_KEY, name)
    }

    fn clear_pointer(&self) -> Result<()> {
        self.kv.remove(defaults::CURRENT_FILE_KEY)
    }

    async fn refresh_names(&mut self) -> Result<()> {
        self.names = self.store.list().await?;
        Ok(())
    }

    /// Fetch the list and restore the previously open document when it
    /// still exists; otherwise auto-open the first listed document, or
    /// settle on the empty state.
    pub async fn initialize(&mut self) -> Result<()> {
        self.refresh_names().await?;
        let remembered = self.kv.get(defaults::CURRENT_FILE_KEY)?;
        let target = match remembered {
            Some(name) if self.names.contains(&name) => Some(name),
            _ => self.names.first().cloned(),
        };
        match target {
            Some(name) => self.open(&name).await?,
            None => {
                self.current = EditorState::Empty;
                self.clear_pointer()?;
            }
        }
        info!(op = "initialize", result_count = self.names.len(), "engine initialized");
        Ok(())
    }

    /// When the store is empty, create and open the welcome document.
    /// An unauth-mode convenience so a first visit is not a blank screen.
    pub async fn seed_welcome(&mut self) -> Result<()> {
        if !self.names.is_empty() {
            return Ok(());
        }
        self.create(Some(defaults::WELCOME_FILENAME)).await
    }

    /// Open a document, cache-first. Opening always yields a saved state:
    /// the cache is a read optimization and a hit says nothing about
    /// unsaved edits.
    pub async fn open(&mut self, name: &str) -> Result<()> {
        let content = self.cache.read_through(self.store.as_ref(), name).await?;
        self.current = EditorState::Document {
            name: name.to_string(),
            content,
            unsaved: false,
        };
        self.set_pointer(name)?;
        debug!(op = "open", filename = name, "document opened");
        Ok(())
    }

    /// Record an edit to the open document. The buffer lives here, not in
    /// the cache, until a save.
    pub fn edit(&mut self, content: impl Into<String>) {
        if let EditorState::Document {
            content: buffer,
            unsaved,
            ..
        } = &mut self.current
        {
            *buffer = content.into();
            *unsaved = true;
        }
    }

    /// Create a new document with the default body and open it. Without a
    /// name, `untitled.md`.
    pub async fn create(&mut self, name: Option<&str>) -> Result<()> {
        let name = ensure_markdown_extension(name.unwrap_or(defaults::UNTITLED_FILENAME));
        validate_filename(&name)?;
        self.store
            .write(&name, defaults::DEFAULT_MD, WriteMode::Create)
            .await?;
        self.cache.put(&name, defaults::DEFAULT_MD)?;
        self.refresh_names().await?;
        self.current = EditorState::Document {
            name: name.clone(),
            content: defaults::DEFAULT_MD.to_string(),
            unsaved: false,
        };
        self.set_pointer(&name)?;
        info!(op = "create", filename = %name, "document created");
        Ok(())
    }

    /// Save `content` under `name`, or under the open document's name when
    /// no name is given. With neither, the caller must obtain a name from
    /// the user first.
    pub async fn save(&mut self, name: Option<&str>, content: &str) -> Result<()> {
        let resolved = match name {
            Some(n) => n.to_string(),
            None => self
                .current
                .name()
                .map(str::to_string)
                .ok_or(Error::NameRequired)?,
        };
        let resolved = ensure_markdown_extension(&resolved);
        validate_filename(&resolved)?;
        // The interactive-naming path saves a document the backend has
        // never seen; everything else updates in place.
        let mode = if self.names.contains(&resolved) {
            WriteMode::Update
        } else {
            WriteMode::Create
        };
        self.store.write(&resolved, content, mode).await?;
        self.cache.put(&resolved, content)?;
        if mode == WriteMode::Create {
            self.refresh_names().await?;
        }
        self.current = EditorState::Document {
            name: resolved.clone(),
            content: content.to_string(),
            unsaved: false,
        };
        self.set_pointer(&resolved)?;
        info!(op = "save", filename = %resolved, "document saved");
        Ok(())
    }

    /// Import external content. A foreign extension is rewritten to `.md`
    /// rather than rejected.
    pub async fn upload(&mut self, original_name: &str, content: &str) -> Result<()> {
        let name = if original_name.trim().is_empty() {
            defaults::UPLOADED_FILENAME.to_string()
        } else {
            rewrite_to_markdown_extension(original_name)
        };
        validate_filename(&name)?;
        self.store.write(&name, content, WriteMode::Create).await?;
        self.cache.put(&name, content)?;
        self.refresh_names().await?;
        self.current = EditorState::Document {
            name: name.clone(),
            content: content.to_string(),
            unsaved: false,
        };
        self.set_pointer(&name)?;
        info!(op = "upload", filename = %name, "document uploaded");
        Ok(())
    }

    /// Rename a document. The open document's name is updated in place;
    /// its content is not re-read.
    pub async fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let new = ensure_markdown_extension(new);
        if old == new {
            return Ok(());
        }
        validate_filename(&new)?;
        self.store.rename(old, &new).await?;
        self.cache.rekey(old, &new)?;
        self.refresh_names().await?;
        if self.current.name() == Some(old) {
            if let EditorState::Document { name, .. } = &mut self.current {
                *name = new.clone();
            }
            self.set_pointer(&new)?;
        }
        info!(op = "rename", filename = old, new_filename = %new, "document renamed");
        Ok(())
    }

    /// Copy a document under the first free `_copy` name and open the copy.
    pub async fn duplicate(&mut self, name: &str) -> Result<()> {
        let content = self.cache.read_through(self.store.as_ref(), name).await?;
        let copy = self.copy_name(name);
        self.store
            .write(&copy, &content, WriteMode::Create)
            .await?;
        self.cache.put(&copy, &content)?;
        self.refresh_names().await?;
        self.current = EditorState::Document {
            name: copy.clone(),
            content,
            unsaved: false,
        };
        self.set_pointer(&copy)?;
        info!(op = "duplicate", filename = name, new_filename = %copy, "document duplicated");
        Ok(())
    }

    /// `base_copy.ext`, then `base_copy1.ext`, `base_copy2.ext`, … against
    /// the currently known names.
    fn copy_name(&self, source: &str) -> String {
        let (base, ext) = match source.rfind('.') {
            Some(dot) if dot > 0 => source.split_at(dot),
            _ => (source, ""),
        };
        let candidate = format!("{}_copy{}", base, ext);
        if !self.names.contains(&candidate) {
            return candidate;
        }
        let mut counter = 1;
        loop {
            let candidate = format!("{}_copy{}{}", base, counter, ext);
            if !self.names.contains(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    /// Delete a document. When the open document was deleted, auto-open the
    /// first remaining one, or fall back to the empty state.
    pub async fn delete(&mut self, name: &str) -> Result<()> {
        self.store.remove(name).await?;
        self.cache.invalidate(name)?;
        self.refresh_names().await?;
        if self.current.name() == Some(name) {
            match self.names.first().cloned() {
                Some(next) => self.open(&next).await?,
                None => {
                    self.current = EditorState::Empty;
                    self.clear_pointer()?;
                }
            }
        }
        info!(op = "delete", filename = name, "document deleted");
        Ok(())
    }

    /// Export copy of a document, with the backend's suggested filename.
    pub async fn download(&self, name: &str) -> Result<Document> {
        self.store.download(name).await
    }
}
