//! Structured logging field name constants for markpad.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log queries work by the same names across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Operation failed and surfaced to the caller |
//! | WARN  | Recoverable issue, automatic fallback applied (e.g. refresh-and-retry) |
//! | INFO  | Lifecycle events (engine init, login/logout), operation completions |
//! | DEBUG | Decision points, cache hits/misses, config choices |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "client", "sync", "cache"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "open", "save", "rename", "refresh", "list"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Document name being operated on.
pub const FILENAME: &str = "filename";

/// Target name of a rename or duplicate.
pub const NEW_FILENAME: &str = "new_filename";

// ─── Transport fields ──────────────────────────────────────────────────────

/// HTTP status of a failed response.
pub const STATUS: &str = "status";

/// Zero-based attempt number of a request (1 after a refresh-and-retry).
pub const ATTEMPT: &str = "attempt";

/// Machine-readable backend error code.
pub const API_CODE: &str = "api_code";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of names returned by a list.
pub const RESULT_COUNT: &str = "result_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Whether the read was served from the cache.
pub const CACHE_HIT: &str = "cache_hit";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
