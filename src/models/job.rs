use std::fmt;
use std::time::Instant;

use hyper::body::Bytes;
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum HttpMethod {
    GET,
    POST,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::GET => f.write_str("GET"),
            HttpMethod::POST => f.write_str("POST"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    None,
    Bearer { token: String },
}

impl Auth {
    pub fn bearer(token: impl Into<String>) -> Self {
        Auth::Bearer { token: token.into() }
    }

    /// Value for the `Authorization` header, if any.
    pub fn header_value(&self) -> Option<String> {
        match self {
            Auth::None => None,
            Auth::Bearer { token } => Some(format!("Bearer {}", token)),
        }
    }
}

/// One fully parameterized request, built right before its batch is handed to
/// the worker pool.
///
/// Bodies are pre-serialized JSON held in `Bytes`, so a large payload shared by a
/// whole batch (the search query) is encoded once and cloned by reference count.
#[derive(Debug, Clone)]
pub struct RequestJob {
    pub queued_at: Instant,
    pub url: Url,
    pub method: HttpMethod,
    pub body: Option<Bytes>,
    pub auth: Auth,
}

impl RequestJob {
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            queued_at: Instant::now(),
            url,
            method,
            body: None,
            auth: Auth::None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(HttpMethod::GET, url)
    }

    pub fn post(url: Url) -> Self {
        Self::new(HttpMethod::POST, url)
    }

    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_json<T: Serialize>(self, payload: &T) -> Result<Self, serde_json::Error> {
        let encoded = serde_json::to_vec(payload)?;
        Ok(self.with_body(Bytes::from(encoded)))
    }

    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }
}
