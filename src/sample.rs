use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The outcome of a single exchange: a status code and the wall-clock time the
/// exchange took.
///
/// The status is either a protocol status code or [`Sample::UNCLASSIFIED`],
/// the reserved sentinel for failures that cannot be mapped to a protocol
/// status (transport errors, mostly). A sample is immutable once built; the
/// latency it carries must be frozen *before* the sample is published, so that
/// time spent waiting on the collector never inflates response times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub status: i32,
    pub latency: Duration,
}

impl Sample {
    /// Sentinel status for transport-level or otherwise unclassifiable
    /// failures. Distinct from every valid protocol status.
    pub const UNCLASSIFIED: i32 = -1;

    pub fn new(status: i32, latency: Duration) -> Self {
        Self { status, latency }
    }

    /// A sample for an exchange that failed without a protocol status.
    pub fn unclassified(latency: Duration) -> Self {
        Self::new(Self::UNCLASSIFIED, latency)
    }

    pub fn is_unclassified(&self) -> bool {
        self.status == Self::UNCLASSIFIED
    }
}

/// Append-only, ordered collection of [`Sample`]s for one run.
///
/// Exclusively owned and mutated by the collector task while the run is live;
/// everyone else only sees it after the collector has returned it. Order
/// reflects arrival at the collector, i.e. arbitrary interleaving across
/// virtual users, not invocation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    /// Pre-size from the expected volume (users × iterations).
    pub fn with_capacity(expected: usize) -> Self {
        Self {
            samples: Vec::with_capacity(expected),
        }
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Latencies as whole milliseconds, the unit the statistics run on.
    pub fn latencies_ms(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(|s| s.latency.as_millis() as f64)
            .collect()
    }
}

impl FromIterator<Sample> for SampleSet {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}
