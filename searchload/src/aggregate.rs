use std::collections::BTreeMap;
use std::fmt::Debug;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::Error;
use crate::macros::aggregate;
use crate::metric::{Metric, Statistics};

/// Folds individual [`Metric`] samples into a compact, mergeable representation.
///
/// Aggregates keep raw material (counts, sums, extremes), never final figures: averages
/// and ratios are derived later by a [`Report`](crate::Report). Each virtual user folds
/// into its own aggregate and the runner merges them at the end, so `merge` must be
/// associative and commutative.
///
/// Failed calls produce no metric, but they still count: `record_failure` receives the
/// error instead.
pub trait Aggregate
where
    Self: Serialize + DeserializeOwned + PartialOrd + PartialEq + Send + Sync + Debug + Clone,
{
    /// The metric type this aggregate summarizes.
    type Metric: Metric;

    /// Create a new, empty instance of the aggregate.
    fn new() -> Self;

    /// Fold several metrics; calls [`consume`](Aggregate::consume) for each.
    fn aggregate(&mut self, metrics: &[Self::Metric]) {
        metrics.iter().for_each(|m| self.consume(m));
    }

    /// Incorporate a single metric into the aggregate.
    fn consume(&mut self, metric: &Self::Metric);

    /// Count a call that ended in an error.
    fn record_failure(&mut self, error: &Error);

    /// Combine two different aggregates into one.
    fn merge(&mut self, other: Self);
}

/// Totals over [`Statistics`] samples.
///
/// Latency extremes are `None` until the first successful sample. Failures are keyed by
/// [`Error::kind`], responses by status code.
#[aggregate]
pub struct StatisticsAggregate {
    pub count: usize,
    pub total_latency: Duration,
    pub min_latency: Option<Duration>,
    pub max_latency: Option<Duration>,
    pub bytes_sent: usize,
    pub bytes_received: usize,
    pub statuses: BTreeMap<u16, usize>,
    pub failures: BTreeMap<String, usize>,
}

impl StatisticsAggregate {
    pub fn failure_count(&self) -> usize {
        self.failures.values().sum()
    }
}

fn min_of(a: Option<Duration>, b: Option<Duration>) -> Option<Duration> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

impl Aggregate for StatisticsAggregate {
    type Metric = Statistics;

    fn new() -> Self {
        Self::default()
    }

    fn consume(&mut self, metric: &Statistics) {
        self.count += 1;
        self.total_latency += metric.latency;
        self.min_latency = min_of(self.min_latency, Some(metric.latency));
        self.max_latency = self.max_latency.max(Some(metric.latency));
        self.bytes_sent += metric.bytes_sent;
        self.bytes_received += metric.bytes_received;
        *self.statuses.entry(metric.response_status).or_default() += 1;
    }

    fn record_failure(&mut self, error: &Error) {
        *self.failures.entry(error.kind().to_string()).or_default() += 1;
    }

    fn merge(&mut self, other: Self) {
        self.count += other.count;
        self.total_latency += other.total_latency;
        self.min_latency = min_of(self.min_latency, other.min_latency);
        self.max_latency = self.max_latency.max(other.max_latency);
        self.bytes_sent += other.bytes_sent;
        self.bytes_received += other.bytes_received;
        for (status, n) in other.statuses {
            *self.statuses.entry(status).or_default() += n;
        }
        for (kind, n) in other.failures {
            *self.failures.entry(kind).or_default() += n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ms: u64, status: u16) -> Statistics {
        Statistics {
            latency: Duration::from_millis(ms),
            bytes_sent: 10,
            bytes_received: 20,
            response_status: status,
        }
    }

    #[test]
    fn consume_tracks_totals_and_extremes() {
        let mut agg = StatisticsAggregate::new();
        agg.aggregate(&[sample(30, 201), sample(10, 201), sample(20, 409)]);

        assert_eq!(agg.count, 3);
        assert_eq!(agg.total_latency, Duration::from_millis(60));
        assert_eq!(agg.min_latency, Some(Duration::from_millis(10)));
        assert_eq!(agg.max_latency, Some(Duration::from_millis(30)));
        assert_eq!(agg.bytes_sent, 30);
        assert_eq!(agg.bytes_received, 60);
        assert_eq!(agg.statuses[&201], 2);
        assert_eq!(agg.statuses[&409], 1);
    }

    #[test]
    fn failures_are_counted_by_kind() {
        let mut agg = StatisticsAggregate::new();
        let refused = || Error::Transport(Box::new(std::io::Error::other("refused")));
        agg.record_failure(&refused());
        agg.record_failure(&refused());
        agg.record_failure(&Error::Config("bad".into()));

        assert_eq!(agg.failures["transport"], 2);
        assert_eq!(agg.failures["config"], 1);
        assert_eq!(agg.failure_count(), 3);
        assert_eq!(agg.count, 0);
    }

    #[test]
    fn merge_is_order_independent() {
        let mut a = StatisticsAggregate::new();
        a.consume(&sample(5, 200));
        let mut b = StatisticsAggregate::new();
        b.consume(&sample(50, 404));
        b.record_failure(&Error::UnknownOperation("bulk".into()));
        let empty = StatisticsAggregate::new();

        let mut ab = a.clone();
        ab.merge(b.clone());
        ab.merge(empty.clone());
        let mut ba = empty;
        ba.merge(b);
        ba.merge(a);

        assert_eq!(ab, ba);
        assert_eq!(ab.count, 2);
        assert_eq!(ab.min_latency, Some(Duration::from_millis(5)));
        assert_eq!(ab.max_latency, Some(Duration::from_millis(50)));
        assert_eq!(ab.failure_count(), 1);
    }
}
