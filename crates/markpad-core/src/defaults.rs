//! Centralized default constants for markpad.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates reference these constants instead of defining their own magic
//! strings.

// =============================================================================
// SERVICES
// =============================================================================

/// Default auth service base URL.
pub const AUTH_URL: &str = "http://localhost:8081";

/// Default storage service base URL.
pub const STORAGE_URL: &str = "http://localhost:8080";

/// Default HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// STORAGE KEYS
// =============================================================================

/// Key-value key holding the unauth-mode document map (JSON object,
/// name → content).
pub const UNAUTH_FILES_KEY: &str = "md_unauth_files";

/// Key-value key holding the auth-mode document cache map (JSON object,
/// name → content). Cache entries never cross the mode boundary, so each
/// mode persists its cache under its own key.
pub const DOC_CACHE_AUTH_KEY: &str = "md_doc_cache_auth";

/// Key-value key holding the unauth-mode document cache map.
pub const DOC_CACHE_UNAUTH_KEY: &str = "md_doc_cache_unauth";

/// Key-value key holding the current-document pointer.
pub const CURRENT_FILE_KEY: &str = "md_current_file";

/// Key-value key holding the sticky operating mode ("auth" / "unauth").
pub const MODE_KEY: &str = "md_mode";

// =============================================================================
// DOCUMENTS
// =============================================================================

/// Name assigned when a new document is created without one.
pub const UNTITLED_FILENAME: &str = "untitled.md";

/// Name assigned to an upload arriving without one.
pub const UPLOADED_FILENAME: &str = "uploaded.md";

/// Name of the document seeded on first unauthenticated start.
pub const WELCOME_FILENAME: &str = "welcome.md";

/// Body given to newly created documents.
pub const DEFAULT_MD: &str = "# New Markdown file\n\nWrite here...\n";
