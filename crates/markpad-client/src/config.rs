//! Client configuration for the auth and storage services.

use markpad_core::defaults;

/// Configuration for the service transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the auth service.
    pub auth_url: String,
    /// Base URL of the storage service.
    pub storage_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_url: defaults::AUTH_URL.to_string(),
            storage_url: defaults::STORAGE_URL.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self {
            auth_url: std::env::var("MARKPAD_AUTH_URL")
                .unwrap_or_else(|_| defaults::AUTH_URL.to_string()),
            storage_url: std::env::var("MARKPAD_STORAGE_URL")
                .unwrap_or_else(|_| defaults::STORAGE_URL.to_string()),
            timeout_seconds: std::env::var("MARKPAD_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::REQUEST_TIMEOUT_SECS),
        }
    }
}
