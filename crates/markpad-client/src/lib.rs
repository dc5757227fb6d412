//! # markpad-client
//!
//! HTTP transport against the auth and storage services: structured
//! API-error normalization, the session refresh-and-retry interceptor, the
//! auth API client, and the remote [`DocumentStore`] backend.
//!
//! [`DocumentStore`]: markpad_core::DocumentStore

pub mod api_error;
pub mod auth;
pub mod config;
pub mod remote;
mod transport;

pub use auth::AuthClient;
pub use config::ClientConfig;
pub use remote::RemoteStore;
pub use transport::Transport;
