use std::future::Future;
use std::marker::PhantomData;

use typed_builder::TypedBuilder;

use crate::executor::Executor;
use crate::sample::{Sample, SampleSet};

/// Glue that ties a load test together: a name, the action being measured,
/// and the executor that drives it.
///
/// The action is the protocol-facing seam: a zero-argument async callable that
/// performs one complete exchange against the target and always resolves to a
/// [`Sample`] — on failure it classifies the error into a status (or the
/// sentinel) rather than propagating it. It is cloned into every virtual
/// user, so anything heavy (clients, payload buffers) should be created once
/// outside and moved in.
#[derive(Debug, Clone, TypedBuilder)]
pub struct Scenario<E, F, Fut>
where
    E: Executor<F, Fut> + Send + Sync,
    F: Fn() -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = Sample> + Send,
{
    #[builder(setter(into))]
    pub name: String,
    pub action: F,
    pub executor: E,
    #[builder(default, setter(skip))]
    marker: PhantomData<fn() -> Fut>,
}

impl<E, F, Fut> Scenario<E, F, Fut>
where
    E: Executor<F, Fut> + Send + Sync,
    F: Fn() -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = Sample> + Send,
{
    /// Run the scenario to completion and hand back the collected samples.
    pub async fn run(&self) -> Result<SampleSet, E::Error> {
        self.executor.exec(self).await
    }
}
