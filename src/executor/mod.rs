//! Executor — orchestration of a scenario's runtime execution.
//!
//! The `Executor` trait is the runtime hook that executes a `Scenario`.
//! Different executors provide different execution strategies; the built-in
//! [`PacedExecutor`] runs a fixed pool of virtual users, each pacing a bounded
//! iteration loop on fixed tick boundaries and publishing every outcome to a
//! single collector.
pub mod paced;
pub use paced::PacedExecutor;

use std::future::Future;

use crate::sample::{Sample, SampleSet};
use crate::scenario::Scenario;

/// The runtime hook that executes a `Scenario`.
///
/// An executor owns concurrency, scheduling and result collection: it decides
/// how many copies of the scenario's action run, when each invocation starts,
/// and how the resulting samples end up in one [`SampleSet`].
pub trait Executor<F, Fut>
where
    Self: Send + Sync + Sized,
    F: Fn() -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = Sample> + Send,
{
    type Error;

    /// Execute the scenario and return the collected samples.
    fn exec(
        &self,
        scenario: &Scenario<Self, F, Fut>,
    ) -> impl Future<Output = Result<SampleSet, Self::Error>> + Send;
}
