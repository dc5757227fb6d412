//! Core traits for markpad abstractions.
//!
//! These traits define the interfaces that concrete backends must satisfy,
//! enabling pluggable storage and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Document, WriteMode};

/// Backend for document storage.
///
/// Two implementations share this contract: the remote store (storage
/// service over HTTP) and the local store (key-value persistence, used in
/// unauthenticated mode). The sync engine is written against this trait
/// only and selects the implementation once at construction — it never
/// branches on which backend is active.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List document names in backend order.
    async fn list(&self) -> Result<Vec<String>>;

    /// Read a document's content.
    async fn read(&self, name: &str) -> Result<String>;

    /// Write content under a name.
    ///
    /// `WriteMode::Create` fails with `AlreadyExists` on collision;
    /// `WriteMode::Update` fails with `NotFound` when the document has
    /// disappeared.
    async fn write(&self, name: &str, content: &str, mode: WriteMode) -> Result<()>;

    /// Rename a document. Fails with `AlreadyExists` when the target name
    /// is taken.
    async fn rename(&self, old_name: &str, new_name: &str) -> Result<()>;

    /// Remove a document.
    async fn remove(&self, name: &str) -> Result<()>;

    /// Fetch an export copy: content plus the backend's suggested filename
    /// (the remote store honors a `Content-Disposition` override).
    async fn download(&self, name: &str) -> Result<Document>;
}

/// Injected key-value persistence capability.
///
/// Stands in for the browser's persistent storage area: the local document
/// backend, the document cache, and the sticky mode/current-document
/// pointers all write through this seam, so tests can substitute an
/// in-memory implementation.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`. Removing a missing key is not
    /// an error.
    fn remove(&self, key: &str) -> Result<()>;
}
