//! Authenticated transport with bounded refresh-and-retry.
//!
//! Requests are described by value so a retry can rebuild them (multipart
//! bodies are re-assembled per attempt). An explicit attempt counter bounds
//! the interceptor at a single refresh and a single replay per request; the
//! counter is per-request, so two requests expiring at the same moment each
//! run their own refresh.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response, Url};
use tokio::sync::watch;
use tracing::{debug, warn};

use markpad_core::{Error, Result, Session};

use crate::api_error::{is_expiry_signal, map_failure, parse_error_body};
use crate::config::ClientConfig;

/// Which service a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Service {
    Auth,
    Storage,
}

/// Request body shape. Rebuilt from this description on every attempt.
#[derive(Debug, Clone)]
pub(crate) enum Payload {
    Empty,
    Json(serde_json::Value),
    /// A multipart form with a single `file` part.
    File {
        filename: String,
        content: String,
    },
}

/// A rebuildable description of one outbound request.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    pub method: Method,
    pub service: Service,
    pub segments: Vec<String>,
    pub payload: Payload,
    /// Document name the operation targets, for resource-error context.
    pub subject: Option<String>,
}

impl ApiRequest {
    pub fn new<S: Into<String>>(method: Method, service: Service, segments: Vec<S>) -> Self {
        Self {
            method,
            service,
            segments: segments.into_iter().map(Into::into).collect(),
            payload: Payload::Empty,
            subject: None,
        }
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.payload = Payload::Json(body);
        self
    }

    pub fn file(mut self, filename: impl Into<String>, content: impl Into<String>) -> Self {
        self.payload = Payload::File {
            filename: filename.into(),
            content: content.into(),
        };
        self
    }

    pub fn subject(mut self, name: impl Into<String>) -> Self {
        self.subject = Some(name.into());
        self
    }
}

/// Cookie-jar HTTP client shared by the auth API and the remote store.
///
/// Credentials are opaque to everything above this type: the services set
/// them as cookies and the jar replays them. Session state is exposed as a
/// watch signal that flips to `Unauthenticated` when a refresh fails.
pub struct Transport {
    http: Client,
    auth_base: Url,
    storage_base: Url,
    session_tx: watch::Sender<Session>,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .cookie_store(true)
            .build()?;

        let auth_base = Url::parse(&config.auth_url)
            .map_err(|e| Error::Request(format!("invalid auth URL: {}", e)))?;
        let storage_base = Url::parse(&config.storage_url)
            .map_err(|e| Error::Request(format!("invalid storage URL: {}", e)))?;

        let (session_tx, _) = watch::channel(Session::Unauthenticated);

        Ok(Self {
            http,
            auth_base,
            storage_base,
            session_tx,
        })
    }

    /// Subscribe to session-state changes.
    pub fn session(&self) -> watch::Receiver<Session> {
        self.session_tx.subscribe()
    }

    /// Current session state.
    pub fn session_state(&self) -> Session {
        *self.session_tx.borrow()
    }

    pub(crate) fn set_session(&self, session: Session) {
        // send_replace never fails; the transport keeps the channel alive.
        self.session_tx.send_replace(session);
    }

    fn url(&self, service: Service, segments: &[String]) -> Result<Url> {
        let mut url = match service {
            Service::Auth => self.auth_base.clone(),
            Service::Storage => self.storage_base.clone(),
        };
        url.path_segments_mut()
            .map_err(|_| Error::Request("base URL cannot be a base".to_string()))?
            .extend(segments);
        Ok(url)
    }

    fn build(&self, req: &ApiRequest) -> Result<reqwest::RequestBuilder> {
        let url = self.url(req.service, &req.segments)?;
        let builder = self.http.request(req.method.clone(), url);
        Ok(match &req.payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(body),
            Payload::File { filename, content } => {
                let part = Part::text(content.clone())
                    .file_name(filename.clone())
                    .mime_str("text/plain")?;
                builder.multipart(Form::new().part("file", part))
            }
        })
    }

    /// Send a request with the bounded refresh-and-retry rule.
    ///
    /// A failure that carries the session-expiry signal triggers exactly one
    /// refresh; refresh success replays the original request exactly once,
    /// refresh failure surfaces `SessionExpired`. Every other failure
    /// propagates unchanged.
    pub(crate) async fn send(&self, req: &ApiRequest) -> Result<Response> {
        let mut attempt: u32 = 0;
        loop {
            let response = self.build(req)?.send().await?;
            if response.status().is_success() {
                return Ok(response);
            }

            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let api = parse_error_body(&body);
            debug!(status, attempt, api_code = %api.code, "request failed");

            if attempt == 0 && is_expiry_signal(status, &api.message) {
                warn!(op = "refresh", "session expired, attempting silent refresh");
                self.refresh().await?;
                attempt += 1;
                continue;
            }

            return Err(map_failure(status, api, req.subject.as_deref()));
        }
    }

    /// Call the refresh endpoint once. Not routed through `send`: the
    /// refresh request is never itself retried.
    pub(crate) async fn refresh(&self) -> Result<()> {
        let url = self.url(Service::Auth, &["v1".to_string(), "refresh".to_string()])?;
        let response = self.http.post(url).send().await?;
        if response.status().is_success() {
            self.set_session(Session::Authenticated);
            Ok(())
        } else {
            warn!("refresh failed, session ended");
            self.set_session(Session::Unauthenticated);
            Err(Error::SessionExpired)
        }
    }
}
