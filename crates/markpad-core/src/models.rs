//! Core data model for the synchronization layer.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A markdown document: the name doubles as the storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub content: String,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Session state as business logic sees it.
///
/// The token itself is opaque and lives in the transport's cookie jar; this
/// type only tracks whether the credentials are currently believed valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Authenticated,
    Unauthenticated,
}

/// Operating mode, chosen once at application entry and sticky for the
/// session. `Unauth` never attempts network calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Auth,
    Unauth,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Auth => "auth",
            Mode::Unauth => "unauth",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "auth" => Some(Mode::Auth),
            "unauth" => Some(Mode::Unauth),
            _ => None,
        }
    }

    /// Key-value key for this mode's document cache. Scoped per mode so a
    /// mode switch can never serve content cached against the other
    /// backend.
    pub fn cache_key(&self) -> &'static str {
        match self {
            Mode::Auth => crate::defaults::DOC_CACHE_AUTH_KEY,
            Mode::Unauth => crate::defaults::DOC_CACHE_UNAUTH_KEY,
        }
    }
}

/// Whether a write creates a new document or updates an existing one.
///
/// The storage service distinguishes the two: creation fails on collision,
/// update fails when the document has disappeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// Normalized backend error: the storage service reports structured
/// `{code, message, field?, details?}` bodies, older revisions report a bare
/// string. Either shape normalizes into this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl ApiError {
    /// A generic error carrying only a human message.
    pub fn generic(message: impl Into<String>) -> Self {
        Self {
            code: "GENERIC".to_string(),
            message: message.into(),
            field: None,
            details: None,
        }
    }
}
