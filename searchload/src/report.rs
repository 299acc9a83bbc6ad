use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use crate::aggregate::{Aggregate, StatisticsAggregate};

/// Final figures derived from an [`Aggregate`].
///
/// Reports are pure data: no I/O, built with `From<A>`. Printing or shipping them is a
/// [`Reporter`]'s job.
pub trait Report<A>
where
    Self: Send + Sync + Debug + From<A> + Serialize + DeserializeOwned,
    A: Aggregate,
{
}

/// Sends a [`Report`] somewhere: stdout, a file, a metrics backend.
pub trait Reporter<A: Aggregate, R: Report<A>> {
    fn report(&self, report: &R) -> impl Future<Output = Result<(), Box<dyn std::error::Error>>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub requests: usize,
    pub failures: usize,
    /// Failed calls as a percentage of all calls
    pub failure_ratio: f64,
    pub average_latency: Duration,
    pub min_latency: Duration,
    pub max_latency: Duration,
    pub bytes_sent: usize,
    pub bytes_received: usize,
    pub statuses: BTreeMap<u16, usize>,
    pub failure_kinds: BTreeMap<String, usize>,
}

impl From<StatisticsAggregate> for StatisticsReport {
    fn from(agg: StatisticsAggregate) -> Self {
        let failures = agg.failure_count();
        let attempts = agg.count + failures;
        Self {
            requests: agg.count,
            failures,
            failure_ratio: if attempts == 0 {
                0.0
            } else {
                failures as f64 / attempts as f64 * 100.0
            },
            average_latency: if agg.count == 0 {
                Duration::ZERO
            } else {
                let nanos = agg.total_latency.as_nanos() / agg.count as u128;
                Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
            },
            min_latency: agg.min_latency.unwrap_or_default(),
            max_latency: agg.max_latency.unwrap_or_default(),
            bytes_sent: agg.bytes_sent,
            bytes_received: agg.bytes_received,
            statuses: agg.statuses,
            failure_kinds: agg.failures,
        }
    }
}

impl Report<StatisticsAggregate> for StatisticsReport {}

/// Pretty-prints the report with `Debug`.
pub struct StdoutReporter;

impl Reporter<StatisticsAggregate, StatisticsReport> for StdoutReporter {
    async fn report(&self, report: &StatisticsReport) -> Result<(), Box<dyn std::error::Error>> {
        println!("{report:#?}");
        Ok(())
    }
}

/// One JSON line per report, for piping into other tools.
pub struct JsonReporter;

impl Reporter<StatisticsAggregate, StatisticsReport> for JsonReporter {
    async fn report(&self, report: &StatisticsReport) -> Result<(), Box<dyn std::error::Error>> {
        println!("{}", serde_json::to_string(report)?);
        Ok(())
    }
}
