//! # markpad-sync
//!
//! The editor-facing synchronization layer: a fully local
//! [`DocumentStore`] backend over an injected [`KeyValueStore`], the
//! persisted document cache, and the sync engine that orchestrates
//! open/save/rename/duplicate/delete across them.
//!
//! [`DocumentStore`]: markpad_core::DocumentStore
//! [`KeyValueStore`]: markpad_core::KeyValueStore

pub mod cache;
pub mod engine;
pub mod local;
pub mod memory;

pub use cache::DocumentCache;
pub use engine::{EditorState, SyncEngine};
pub use local::LocalStore;
pub use memory::MemoryKv;

use std::sync::Arc;

use markpad_client::{AuthClient, ClientConfig, RemoteStore, Transport};
use markpad_core::{defaults, KeyValueStore, Mode, Result};

/// Construct an engine for the chosen mode. The mode boundary is hard:
/// switching means building a new engine against the other backend, never
/// swapping adapters under a live one. Auth mode also yields the auth
/// client sharing the engine's transport.
pub fn engine_for_mode(
    mode: Mode,
    config: &ClientConfig,
    kv: Arc<dyn KeyValueStore>,
) -> Result<(SyncEngine, Option<AuthClient>)> {
    match mode {
        Mode::Auth => {
            let transport = Arc::new(Transport::new(config)?);
            let auth = AuthClient::new(transport.clone());
            let store = Arc::new(RemoteStore::new(transport));
            Ok((SyncEngine::new(store, kv, mode), Some(auth)))
        }
        Mode::Unauth => {
            let store = Arc::new(LocalStore::new(kv.clone()));
            Ok((SyncEngine::new(store, kv, mode), None))
        }
    }
}

/// Read the sticky mode choice. Absent or unparseable values fall back to
/// unauth mode, which needs no credentials to be useful.
pub fn resolve_mode(kv: &dyn KeyValueStore) -> Result<Mode> {
    Ok(kv
        .get(defaults::MODE_KEY)?
        .and_then(|s| Mode::parse(&s))
        .unwrap_or(Mode::Unauth))
}

/// Persist the mode choice so a reload keeps the same backend.
pub fn persist_mode(kv: &dyn KeyValueStore, mode: Mode) -> Result<()> {
    kv.set(defaults::MODE_KEY, mode.as_str())
}
