//! Resolved wire requests.
//!
//! A [`Request`] is fully built before any I/O happens. Its body is immutable and its
//! length is fixed at construction, which is what byte accounting relies on: transports
//! only ever borrow the request, so there is no drained stream to re-read afterwards.
use std::fmt;

use bytes::Bytes;
use serde::Serialize;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Response shape the cluster is expected to answer with.
///
/// Payloads are never decoded here; the kind is carried for logging and for callers
/// that decode the captured body themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    IndexCreated,
    IndexDeleted,
    DocumentCreated,
    DocumentDeleted,
}

/// An encoded JSON payload. Cloning shares the underlying buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody(Bytes);

impl RequestBody {
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self(Bytes::from(serde_json::to_vec(value)?)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    segments: Vec<String>,
    body: Option<RequestBody>,
    expects: ResponseKind,
}

impl Request {
    pub fn new(method: Method, segments: Vec<String>, expects: ResponseKind) -> Self {
        Self {
            method,
            segments,
            body: None,
            expects,
        }
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Unencoded path segments; transports percent-encode them.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Human-readable path, for logs.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    pub fn expects(&self) -> ResponseKind {
        self.expects
    }

    /// Bytes this request puts on the wire as payload.
    pub fn content_length(&self) -> usize {
        self.body.as_ref().map_or(0, RequestBody::len)
    }
}
