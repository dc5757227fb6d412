//! Auth service client.
//!
//! Credentials travel as cookies managed by the transport's jar; this client
//! only drives the session lifecycle and flips the shared session signal.

use std::sync::Arc;

use reqwest::Method;
use serde_json::json;
use tracing::{info, warn};

use markpad_core::{Result, Session};

use crate::transport::{ApiRequest, Service, Transport};

/// Client for the auth service (`/v1/*` routes).
#[derive(Clone)]
pub struct AuthClient {
    transport: Arc<Transport>,
}

impl AuthClient {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    fn request(&self, method: Method, route: &str) -> ApiRequest {
        ApiRequest::new(method, Service::Auth, vec!["v1", route])
    }

    /// Log in with username and password. On success the service sets the
    /// credential cookies and the session becomes authenticated.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let req = self
            .request(Method::POST, "login")
            .json(json!({ "username": username, "password": password }));
        self.transport.send(&req).await?;
        self.transport.set_session(Session::Authenticated);
        info!(op = "login", "session started");
        Ok(())
    }

    /// Register a new account. Registration does not log in.
    pub async fn register(&self, username: &str, password: &str) -> Result<()> {
        let req = self
            .request(Method::POST, "register")
            .json(json!({ "username": username, "password": password }));
        self.transport.send(&req).await?;
        info!(op = "register", "account created");
        Ok(())
    }

    /// Log out and clear the session. The session signal flips to
    /// unauthenticated even when the server call fails: local state must
    /// not stay authenticated after the user asked to leave.
    pub async fn logout(&self) -> Result<()> {
        let req = self.request(Method::POST, "logout");
        let outcome = self.transport.send(&req).await;
        self.transport.set_session(Session::Unauthenticated);
        match outcome {
            Ok(_) => {
                info!(op = "logout", "session ended");
                Ok(())
            }
            Err(e) => {
                warn!(op = "logout", error = %e, "server logout failed, session cleared locally");
                Err(e)
            }
        }
    }

    /// Ask the service whether the current credentials are valid. Returns
    /// the resulting session state rather than an error: an unauthenticated
    /// answer is an expected outcome, not a failure.
    pub async fn check_session(&self) -> Result<Session> {
        let req = self.request(Method::GET, "check_auth");
        match self.transport.send(&req).await {
            Ok(_) => {
                self.transport.set_session(Session::Authenticated);
                Ok(Session::Authenticated)
            }
            Err(markpad_core::Error::SessionExpired)
            | Err(markpad_core::Error::Unauthorized(_)) => {
                self.transport.set_session(Session::Unauthenticated);
                Ok(Session::Unauthenticated)
            }
            Err(e) => Err(e),
        }
    }

    /// Explicitly refresh the credentials.
    pub async fn refresh(&self) -> Result<()> {
        self.transport.refresh().await
    }

    /// Liveness probe of the auth service.
    pub async fn health(&self) -> Result<()> {
        let req = ApiRequest::new(Method::GET, Service::Auth, vec!["health"]);
        self.transport.send(&req).await?;
        Ok(())
    }

    /// Current session state.
    pub fn session_state(&self) -> Session {
        self.transport.session_state()
    }
}
