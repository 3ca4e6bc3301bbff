//! HTTP transport seam between the admin client and the backend

use std::time::Duration;
use async_trait::async_trait;
use crate::client::errors::AdminError;

/// HTTP methods used against the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    // either a path relative to the backend (`/status`) or an absolute URL
    pub url: String,
    pub body: Option<String>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Percent-encodes `id` for use as a single path segment
///
/// Unreserved characters and `:` (IPv6) pass through, everything else is
/// `%XX` encoded, so `10.0.0.0/24` stays one segment.
pub fn encode_segment(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b':' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Sends one request and returns whatever the backend answered
///
/// A non-2xx answer is still a `Response`; only failures to complete the
/// exchange are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, AdminError>;
}

/// ureq-backed transport, blocking calls run on the tokio blocking pool
pub struct HttpTransport {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: builder.build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}{}", self.base_url, url)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Response, AdminError> {
        let agent = self.agent.clone();
        let url = self.resolve(&request.url);
        tracing::debug!("{} {}", request.method.as_str(), url);

        tokio::task::spawn_blocking(move || {
            let call = agent
                .request(request.method.as_str(), &url)
                .set("Content-Type", "application/json");

            let result = match &request.body {
                Some(body) => call.send_string(body),
                None => call.call(),
            };

            let response = match result {
                Ok(response) => response,
                Err(ureq::Error::Status(_, response)) => response,
                Err(ureq::Error::Transport(e)) => return Err(AdminError::Network(e.to_string())),
            };

            let status = response.status();
            let body = response
                .into_string()
                .map_err(|e| AdminError::Network(e.to_string()))?;
            Ok(Response { status, body })
        })
        .await
        .map_err(|e| AdminError::Network(e.to_string()))?
    }
}
