//! The capability the executor calls through, and the reqwest-backed connection that
//! provides it against a real cluster.
use std::fmt;
use std::future::Future;

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};

use crate::config::{ConnectionConfig, REDACTED};
use crate::error::{Error, Result};
use crate::request::Request;

/// Anything that can put a [`Request`] on the wire.
///
/// A call happens in two steps. `prepare` borrows the request and builds whatever the
/// wire needs (URL, headers, body handle) without touching the network; `send` performs
/// the round-trip. The caller keeps the request, so its body length stays known.
/// Implementations must not retry: each `send` is one round-trip.
pub trait Transport: Send + Sync {
    type Prepared: Send;
    type Response: WireResponse;

    fn prepare(&self, request: &Request) -> Result<Self::Prepared>;

    /// Resolves once the response head has arrived. A non-2xx status is still `Ok`.
    fn send(&self, prepared: Self::Prepared) -> impl Future<Output = Result<Self::Response>> + Send;
}

/// A response whose body can be read exactly once.
///
/// `into_body` takes `self`, so a second read does not compile.
pub trait WireResponse: Send {
    fn status(&self) -> u16;

    fn into_body(self) -> impl Future<Output = Result<Bytes>> + Send;
}

/// An authenticated handle to one cluster address.
///
/// Owned by a single virtual user; calls only read from it.
#[derive(Clone)]
pub struct Connection {
    client: Client,
    base: Url,
    credentials: Option<(String, Option<String>)>,
}

impl Connection {
    pub fn open(config: &ConnectionConfig) -> Result<Self> {
        let base = Url::parse(&config.address).map_err(|e| Error::InvalidAddress {
            address: config.address.clone(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidAddress {
                address: config.address.clone(),
                reason: "address cannot carry a path".to_string(),
            });
        }

        let mut builder = Client::builder().danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(Error::Connect)?;

        tracing::debug!(address = %base, insecure = config.accept_invalid_certs, "opened connection");
        Ok(Self {
            client,
            base,
            credentials: config
                .username
                .clone()
                .map(|user| (user, config.password.clone())),
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url_for(&self, request: &Request) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidAddress {
                address: self.base.to_string(),
                reason: "address cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(request.segments());
        Ok(url)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (username, password) = match &self.credentials {
            Some((user, password)) => (Some(user), password.as_ref().map(|_| REDACTED)),
            None => (None, None),
        };
        f.debug_struct("Connection")
            .field("base", &self.base)
            .field("username", &username)
            .field("password", &password)
            .finish_non_exhaustive()
    }
}

impl Transport for Connection {
    type Prepared = reqwest::Request;
    type Response = reqwest::Response;

    fn prepare(&self, request: &Request) -> Result<reqwest::Request> {
        let mut builder = self
            .client
            .request(request.method().into(), self.url_for(request)?);
        if let Some((user, password)) = &self.credentials {
            builder = builder.basic_auth(user, password.as_deref());
        }
        if let Some(body) = request.body() {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.as_bytes().clone());
        }
        builder.build().map_err(Error::transport)
    }

    async fn send(&self, prepared: reqwest::Request) -> Result<reqwest::Response> {
        self.client.execute(prepared).await.map_err(Error::transport)
    }
}

impl WireResponse for reqwest::Response {
    fn status(&self) -> u16 {
        reqwest::Response::status(self).as_u16()
    }

    async fn into_body(self) -> Result<Bytes> {
        self.bytes().await.map_err(Error::body_read)
    }
}
