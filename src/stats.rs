//! Aggregate statistics over a finished run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sample::SampleSet;

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("percentile is undefined over an empty sample set")]
    EmptySampleSet,
    #[error("percentile rank must lie in (0, 100], got {0}")]
    RankOutOfRange(f64),
}

/// Interpolated percentile of `rank` (in percent) over `samples`.
///
/// Sorts a copy of the input and linearly interpolates between the two
/// neighboring order statistics: with n samples the rank maps to position
/// `rank / 100 × (n − 1)` in the sorted data. An empty input is an error, not
/// a zero — a percentile of nothing does not exist.
pub fn percentile(samples: &[f64], rank: f64) -> Result<f64, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::EmptySampleSet);
    }
    if !(rank > 0.0 && rank <= 100.0) {
        return Err(StatsError::RankOutOfRange(rank));
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = (rank / 100.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return Ok(sorted[lower]);
    }
    let weight = pos - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// What a finished run boils down to: how many exchanges completed and the
/// 95th-percentile response time in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub p95_ms: f64,
}

impl TryFrom<&SampleSet> for Summary {
    type Error = StatsError;

    fn try_from(set: &SampleSet) -> Result<Self, StatsError> {
        let p95_ms = percentile(&set.latencies_ms(), 95.0)?;
        Ok(Self {
            count: set.len(),
            p95_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::sample::Sample;

    #[test]
    fn p95_over_known_samples_matches_reference() {
        // 10, 20, ..., 1000 ms: position 0.95 × 99 = 94.05 interpolates
        // between 950 and 960.
        let samples: Vec<f64> = (1..=100).map(|i| (i * 10) as f64).collect();
        let p95 = percentile(&samples, 95.0).unwrap();
        assert!((p95 - 950.5).abs() < 1e-9, "got {p95}");
    }

    #[test]
    fn percentile_sorts_unordered_input() {
        let samples = vec![30.0, 10.0, 20.0];
        assert_eq!(percentile(&samples, 50.0).unwrap(), 20.0);
    }

    #[test]
    fn single_sample_is_its_own_percentile() {
        assert_eq!(percentile(&[42.0], 95.0).unwrap(), 42.0);
    }

    #[test]
    fn empty_input_is_an_error_not_a_zero() {
        assert_eq!(percentile(&[], 95.0), Err(StatsError::EmptySampleSet));
    }

    #[test]
    fn out_of_range_rank_is_rejected() {
        assert_eq!(
            percentile(&[1.0], 0.0),
            Err(StatsError::RankOutOfRange(0.0))
        );
        assert_eq!(
            percentile(&[1.0], 101.0),
            Err(StatsError::RankOutOfRange(101.0))
        );
    }

    #[test]
    fn summary_from_samples() {
        let set: SampleSet = (1..=100)
            .map(|i| Sample::new(0, Duration::from_millis(i * 10)))
            .collect();
        let summary = Summary::try_from(&set).unwrap();
        assert_eq!(summary.count, 100);
        assert!((summary.p95_ms - 950.5).abs() < 1e-9);
    }

    #[test]
    fn summary_of_empty_run_fails() {
        let set = SampleSet::default();
        assert_eq!(Summary::try_from(&set), Err(StatsError::EmptySampleSet));
    }
}
