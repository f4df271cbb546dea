//! The single consumer on the other end of the publish channel.

use tokio::sync::mpsc;

use crate::sample::{Sample, SampleSet};

/// Drains published [`Sample`]s into one exclusively-owned [`SampleSet`].
///
/// Many virtual users publish concurrently; only this task ever touches the
/// set, so no locking is involved. The task runs until the channel is closed
/// *and* empty — `recv` keeps yielding buffered samples after the last sender
/// is dropped — which makes channel closure the shutdown protocol: once every
/// user has finished (and therefore dropped its sender), the collector drains
/// whatever is in flight and returns. Nothing here sleeps or guesses.
pub async fn collector_task(mut rx: mpsc::Receiver<Sample>, expected: usize) -> SampleSet {
    let mut set = SampleSet::with_capacity(expected);
    while let Some(sample) = rx.recv().await {
        set.push(sample);
    }
    tracing::debug!(samples = set.len(), "publish channel closed, collector stopping");
    set
}
