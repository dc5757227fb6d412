//! # markpad-core
//!
//! Core types, traits, and abstractions for the markpad document
//! synchronization layer.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the client and sync crates depend on: the error taxonomy, the
//! filename contract, and the backend seams (`DocumentStore`,
//! `KeyValueStore`).

pub mod defaults;
pub mod error;
pub mod filename;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use filename::{
    ensure_markdown_extension, rewrite_to_markdown_extension, validate_filename, FilenameError,
};
pub use models::{ApiError, Document, Mode, Session, WriteMode};
pub use traits::{DocumentStore, KeyValueStore};
