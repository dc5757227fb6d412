//! Remote document store over the storage service.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info};

use markpad_core::{Document, DocumentStore, Result, WriteMode};

use crate::transport::{ApiRequest, Service, Transport};

/// `filename*=UTF-8''...` (RFC 5987) takes priority over the plain
/// `filename="..."` parameter when both are present.
static CONTENT_DISPOSITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"filename\*=UTF-8''([^;]+)|filename="?([^";]+)"?"#).unwrap());

#[derive(Debug, Deserialize)]
struct FileListing {
    files: Vec<String>,
}

/// [`DocumentStore`] backed by the storage service's `/api` routes.
pub struct RemoteStore {
    transport: Arc<Transport>,
}

impl RemoteStore {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    fn file_request(&self, method: Method, name: &str) -> ApiRequest {
        ApiRequest::new(method, Service::Storage, vec!["api", "file", name]).subject(name)
    }
}

#[async_trait]
impl DocumentStore for RemoteStore {
    async fn list(&self) -> Result<Vec<String>> {
        let req = ApiRequest::new(Method::GET, Service::Storage, vec!["api", "files"]);
        let listing: FileListing = self.transport.send(&req).await?.json().await?;
        debug!(
            subsystem = "remote",
            result_count = listing.files.len(),
            "listed documents"
        );
        Ok(listing.files)
    }

    async fn read(&self, name: &str) -> Result<String> {
        let req = self.file_request(Method::GET, name);
        let content = self.transport.send(&req).await?.text().await?;
        Ok(content)
    }

    async fn write(&self, name: &str, content: &str, mode: WriteMode) -> Result<()> {
        let method = match mode {
            WriteMode::Create => Method::POST,
            WriteMode::Update => Method::PUT,
        };
        let req = self.file_request(method, name).file(name, content);
        self.transport.send(&req).await?;
        info!(subsystem = "remote", op = "write", filename = name, "document written");
        Ok(())
    }

    async fn rename(&self, old: &str, new: &str) -> Result<()> {
        let req = ApiRequest::new(
            Method::PUT,
            Service::Storage,
            vec!["api", "file", old, "rename", new],
        )
        .subject(old);
        self.transport.send(&req).await?;
        info!(
            subsystem = "remote",
            op = "rename",
            filename = old,
            new_filename = new,
            "document renamed"
        );
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        let req = self.file_request(Method::DELETE, name);
        self.transport.send(&req).await?;
        info!(subsystem = "remote", op = "remove", filename = name, "document removed");
        Ok(())
    }

    async fn download(&self, name: &str) -> Result<Document> {
        let req = self.file_request(Method::GET, name);
        let response = self.transport.send(&req).await?;
        let suggested = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_disposition_filename)
            .unwrap_or_else(|| name.to_string());
        let content = response.text().await?;
        Ok(Document::new(suggested, content))
    }
}

/// Pull the suggested filename out of a Content-Disposition header value.
fn parse_disposition_filename(value: &str) -> Option<String> {
    let caps = CONTENT_DISPOSITION.captures(value)?;
    if let Some(encoded) = caps.get(1) {
        return Some(percent_decode(encoded.as_str()));
    }
    caps.get(2).map(|m| m.as_str().to_string())
}

/// Minimal percent-decoding for the RFC 5987 filename form. Invalid escapes
/// pass through untouched.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Some(byte) = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|_| input.to_string())
}
