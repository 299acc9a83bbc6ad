//! searchload: instrumented index and document operations for load testing a search
//! cluster.
//!
//! Each call resolves a small operation vocabulary into a concrete HTTP request, runs it
//! exactly once, and hands back a [`Statistics`] record: latency, bytes sent, bytes
//! received and response status. Load generators fold those records into throughput and
//! latency figures.
//!
//! # Architecture
//!
//! The main building blocks are:
//!
//! - [`resolve()`]: maps an [`Operation`] and an [`Entity`] to a [`Request`]. Pure, apart
//!   from synthesizing document ids and bodies with a [`RandomSource`].
//! - [`execute()`]: the instrumented executor. Sends the request through a [`Transport`],
//!   times the round-trip and counts bytes without reading any body twice.
//! - [`OpenSearch`]: what a virtual user scripts against, `create_index`,
//!   `delete_index`, `create_document` and `delete_document`.
//! - [`Aggregate`], [`Report`], [`Reporter`]: fold, summarize and publish statistics.
//! - [`Scenario`] and [`ConstantVus`]: run many virtual users in parallel, each with its
//!   own connection, each issuing calls sequentially.
//!
//! # Example
//!
//! ```rust,no_run
//! use searchload::{ConnectionConfig, OpenSearch};
//!
//! # async fn run() -> searchload::Result<()> {
//! let config = ConnectionConfig::builder()
//!     .address("https://localhost:9200")
//!     .username("admin")
//!     .password("admin")
//!     .accept_invalid_certs(true)
//!     .build();
//! let os = OpenSearch::open(&config)?;
//!
//! let stats = os.create_index("logs-2024", 3, 1).await?;
//! println!("{stats}");
//! let stats = os.create_document("logs-2024", None, None).await?;
//! println!("{stats}");
//! # Ok(())
//! # }
//! ```
//!
//! # What this crate does not do
//!
//! It does not decode response payloads beyond their size and status, retry, pool
//! connections across virtual users, or discover cluster topology.

extern crate self as searchload;

/// Metric aggregators
pub mod aggregate;
/// Per-virtual-user call surface
pub mod client;
pub mod config;
/// Transport capability and the HTTP connection
pub mod connection;
pub mod error;
pub mod instrument;
/// Single metrics
pub mod metric;
pub mod operation;
pub mod random;
/// Reports and Reporters
pub mod report;
pub mod request;
pub mod resolve;
pub mod runner;
pub mod scenario;

#[cfg(test)]
pub(crate) mod test_utils;

/// Procedural macros to reduce boilerplate
pub mod macros {
    pub use searchload_macros::*;
}

pub use aggregate::{Aggregate, StatisticsAggregate};
pub use client::OpenSearch;
pub use config::ConnectionConfig;
pub use connection::{Connection, Transport, WireResponse};
pub use error::{Error, Result};
pub use instrument::{execute, execute_captured};
pub use metric::{Metric, Statistics};
pub use operation::{Entity, EntityKind, Operation};
pub use random::RandomSource;
pub use report::{JsonReporter, Report, Reporter, StatisticsReport, StdoutReporter};
pub use request::{Method, Request, RequestBody, ResponseKind};
pub use resolve::resolve;
pub use runner::ConstantVus;
pub use scenario::Scenario;
