use std::fmt::{self, Debug};
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};

use crate::macros::metric;

/// A single observed measurement.
///
/// Metrics are folded into an [`crate::Aggregate`], which a [`crate::Report`] later
/// turns into final figures. They must be serializable so they can leave the process,
/// and comparable so they can be sorted during analysis.
///
/// Use [`macro@metric`] to attach the required derives and the impl in one go:
///
/// ```rust
/// use searchload::macros::metric;
/// use std::time::Duration;
///
/// #[metric]
/// struct QueueWait {
///     waited: Duration,
/// }
/// ```
pub trait Metric
where
    Self: Serialize + DeserializeOwned + PartialOrd + PartialEq + Send + Sync + Debug + Clone,
{
}

/// Network cost of one call: produced exactly once per successful execution.
///
/// `latency` covers the round-trip up to the response head; `bytes_sent` is the
/// payload length known before the call went out.
#[metric]
#[derive(Eq, Hash)]
pub struct Statistics {
    pub latency: Duration,
    pub bytes_sent: usize,
    pub bytes_received: usize,
    pub response_status: u16,
}

impl Statistics {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.response_status)
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "status={} latency={:?} sent={}B received={}B",
            self.response_status, self.latency, self.bytes_sent, self.bytes_received
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_every_field() {
        let stats = Statistics {
            latency: Duration::from_millis(5),
            bytes_sent: 10,
            bytes_received: 12,
            response_status: 201,
        };
        assert_eq!(stats.to_string(), "status=201 latency=5ms sent=10B received=12B");
        assert!(stats.is_success());
    }

    #[test]
    fn serializes_to_json() {
        let stats = Statistics {
            latency: Duration::from_millis(1),
            bytes_sent: 0,
            bytes_received: 2,
            response_status: 404,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["response_status"], 404);
        assert_eq!(json["bytes_received"], 2);
        assert!(!stats.is_success());
        let back: Statistics = serde_json::from_value(json).unwrap();
        assert_eq!(back, stats);
    }
}
