//! Scripted transport for unit tests.
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;

use crate::connection::{Transport, WireResponse};
use crate::error::{Error, Result};
use crate::request::Request;

#[derive(Debug, Clone)]
pub enum Outcome {
    Reply { status: u16, body: Bytes },
    PrepareFails,
    TransportFails,
    BodyFails { status: u16 },
}

impl Outcome {
    pub fn ok(status: u16, body: &'static [u8]) -> Self {
        Outcome::Reply {
            status,
            body: Bytes::from_static(body),
        }
    }
}

pub struct MockTransport {
    outcome: Outcome,
    delay: Duration,
    prepare_cost: Duration,
    calls: AtomicUsize,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            delay: Duration::ZERO,
            prepare_cost: Duration::ZERO,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Simulated round-trip time; pair with a paused tokio clock.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Wall-clock time burnt while building the request, before anything is sent.
    pub fn with_prepare_cost(mut self, cost: Duration) -> Self {
        self.prepare_cost = cost;
        self
    }

    /// Round-trips actually sent.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

pub struct MockResponse {
    status: u16,
    body: Option<Bytes>,
}

impl Transport for MockTransport {
    type Prepared = Request;
    type Response = MockResponse;

    fn prepare(&self, request: &Request) -> Result<Request> {
        if !self.prepare_cost.is_zero() {
            std::thread::sleep(self.prepare_cost);
        }
        match self.outcome {
            Outcome::PrepareFails => Err(Error::transport(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "invalid header value",
            ))),
            _ => Ok(request.clone()),
        }
    }

    async fn send(&self, request: Request) -> Result<MockResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.outcome {
            Outcome::Reply { status, body } => Ok(MockResponse {
                status: *status,
                body: Some(body.clone()),
            }),
            Outcome::PrepareFails => unreachable!("prepare already failed"),
            Outcome::TransportFails => Err(Error::transport(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
            Outcome::BodyFails { status } => Ok(MockResponse {
                status: *status,
                body: None,
            }),
        }
    }
}

impl WireResponse for MockResponse {
    fn status(&self) -> u16 {
        self.status
    }

    async fn into_body(self) -> Result<Bytes> {
        self.body.ok_or_else(|| {
            Error::body_read(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed mid-body",
            ))
        })
    }
}
