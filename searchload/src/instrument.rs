//! Instrumented Executor: run a resolved [`Request`] once and measure it.
//!
//! Accounting rules:
//! - `bytes_sent` is the request's content length, taken before the call. The request
//!   is only borrowed by the transport, so its body is never drained underneath us.
//! - `latency` brackets exactly the round-trip up to the response head. Resolving the
//!   request, [`Transport::prepare`] and reading the body are outside the window.
//! - The response body is read once, by [`WireResponse::into_body`]; `bytes_received`
//!   and any captured copy both come from that single read.
//! - Failures short-circuit: no partial [`Statistics`] ever leaves this module.
use bytes::Bytes;
use tokio::time::Instant;

use crate::connection::{Transport, WireResponse};
use crate::error::Result;
use crate::metric::Statistics;
use crate::request::Request;

pub async fn execute<T: Transport>(transport: &T, request: &Request) -> Result<Statistics> {
    execute_captured(transport, request)
        .await
        .map(|(statistics, _)| statistics)
}

/// Like [`execute`], also handing back the response body read during accounting.
pub async fn execute_captured<T: Transport>(
    transport: &T,
    request: &Request,
) -> Result<(Statistics, Bytes)> {
    let bytes_sent = request.content_length();

    let prepared = transport.prepare(request)?;
    let start = Instant::now();
    let response = transport.send(prepared).await?;
    let latency = start.elapsed();

    let response_status = response.status();
    let body = response.into_body().await?;

    let statistics = Statistics {
        latency,
        bytes_sent,
        bytes_received: body.len(),
        response_status,
    };
    tracing::trace!(
        method = %request.method(),
        path = %request.path(),
        expects = ?request.expects(),
        %statistics,
        "request measured"
    );
    Ok((statistics, body))
}
