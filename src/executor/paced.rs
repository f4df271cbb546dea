//! Fixed-pace execution: M virtual users × L iterations at interval T.
//!
//! `PacedExecutor` spawns one task per virtual user. Each user runs a bounded
//! loop: invoke the scenario's action, publish the resulting [`Sample`], then
//! wait for the next tick boundary of the pacing interval. Tick boundaries are
//! multiples of the interval measured from the user's own loop start, so a
//! slow invocation delays nothing but itself: the next iteration starts
//! immediately, without catch-up bursts and without dropping iterations.
//!
//! All users publish into one bounded mpsc channel consumed by a single
//! collector task. Shutdown is a completion protocol, not a timer: the
//! executor joins every user, which drops the last `Sender`, which closes the
//! channel, which lets the collector drain whatever is still in flight and
//! return the final set. The channel is sized generously (see
//! `channel_slack`) so a momentarily busy collector does not stall user ticks
//! through publish backpressure.
//!
//! Cancellation is cooperative: a shared `watch` flag is checked before each
//! iteration and while waiting on a tick. An in-flight invocation is never
//! aborted; a cancelled user simply performs no further iteration.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{mpsc, watch};
use typed_builder::TypedBuilder;

use super::Executor;
use crate::collector::collector_task;
use crate::sample::{Sample, SampleSet};
use crate::scenario::Scenario;

/// Executor that drives a fixed pool of virtual users, each pacing its own
/// bounded iteration loop on fixed tick boundaries.
#[derive(Debug, Clone, TypedBuilder)]
pub struct PacedExecutor {
    /// Number of virtual users (concurrent drivers).
    pub users: usize,
    /// Iterations each user performs. Zero means no invocations at all.
    pub iterations: usize,
    /// Pacing interval between iteration starts within one user.
    #[builder(default = Duration::from_secs(1))]
    pub interval: Duration,
    /// Publish-channel capacity per user. The default leaves enough slack
    /// that users do not block on publish while the collector catches up.
    #[builder(default = 4)]
    pub channel_slack: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("virtual user task panicked: {0}")]
    User(tokio::task::JoinError),
    #[error("collector task panicked: {0}")]
    Collector(tokio::task::JoinError),
}

impl<F, Fut> Executor<F, Fut> for PacedExecutor
where
    F: Fn() -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = Sample> + Send + 'static,
{
    type Error = ExecutorError;

    async fn exec(&self, scenario: &Scenario<Self, F, Fut>) -> Result<SampleSet, ExecutorError> {
        let expected = self.users * self.iterations;
        let (tx, rx) = mpsc::channel((self.users * self.channel_slack).max(1));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tracing::info!(
            scenario = %scenario.name,
            users = self.users,
            iterations = self.iterations,
            interval = ?self.interval,
            "spawning collector and virtual users"
        );
        let collector = tokio::spawn(collector_task(rx, expected));
        let handles = internals::spawn_users(
            shutdown_rx,
            self.users,
            self.iterations,
            self.interval,
            scenario.action.clone(),
            tx,
        );

        // Every user owns a Sender clone; once all of them have finished the
        // channel closes on its own and the collector drains and stops. The
        // shutdown handle stays alive across the join so that dropping it is
        // never mistaken for cancellation.
        let joined = join_all(handles).await;
        drop(shutdown_tx);

        let set = collector.await.map_err(ExecutorError::Collector)?;
        for res in joined {
            res.map_err(ExecutorError::User)?;
        }

        tracing::info!(scenario = %scenario.name, samples = set.len(), "run complete");
        Ok(set)
    }
}

#[cfg(feature = "internals")]
pub use internals::{run_user, spawn_users};

mod internals {
    use tokio::task::JoinHandle;
    use tokio::time::MissedTickBehavior;

    use super::*;

    /// One virtual user: up to `iterations` strictly sequential invocations
    /// of `action`, each followed by a wait for the next tick boundary of
    /// `interval`, boundaries measured from loop start.
    ///
    /// `MissedTickBehavior::Skip` gives the pacing contract its shape: when
    /// an invocation overruns the interval the next one starts immediately
    /// and the schedule realigns to the original boundaries — no burst of
    /// make-up ticks, no lost iterations.
    ///
    /// The shutdown flag is honored before each iteration and while waiting
    /// on a tick; a dropped shutdown handle counts as cancellation. Failed
    /// exchanges are logged and never abort the loop.
    pub async fn run_user<F, Fut>(
        mut shutdown: watch::Receiver<bool>,
        iterations: usize,
        interval: Duration,
        action: F,
        tx: mpsc::Sender<Sample>,
    ) where
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = Sample> + Send,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; consume it so the loop's
        // waits land on interval boundaries counted from here.
        ticker.tick().await;

        for _ in 0..iterations {
            if *shutdown.borrow() {
                return;
            }
            let sample = action().await;
            if sample.is_unclassified() {
                tracing::warn!(latency = ?sample.latency, "exchange failed without a protocol status");
            }
            // The sample's clock is already stopped; publish latency is the
            // collector's problem, not the target's.
            if tx.send(sample).await.is_err() {
                return;
            }
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.wait_for(|stop| *stop) => return,
            }
        }
    }

    /// Spawn `users` independent driver tasks sharing one publish channel.
    /// The passed `tx` is consumed; each user gets its own clone, so channel
    /// closure tracks user completion exactly.
    pub fn spawn_users<F, Fut>(
        shutdown: watch::Receiver<bool>,
        users: usize,
        iterations: usize,
        interval: Duration,
        action: F,
        tx: mpsc::Sender<Sample>,
    ) -> Vec<JoinHandle<()>>
    where
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = Sample> + Send + 'static,
    {
        (0..users)
            .map(|_| {
                tokio::spawn(run_user(
                    shutdown.clone(),
                    iterations,
                    interval,
                    action.clone(),
                    tx.clone(),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::time::Instant;

    use super::internals::{run_user, spawn_users};
    use super::*;

    fn instant_ok() -> impl Fn() -> std::future::Ready<Sample> + Send + Sync + Clone {
        || std::future::ready(Sample::new(0, Duration::from_millis(1)))
    }

    fn scenario_with(
        executor: PacedExecutor,
    ) -> Scenario<PacedExecutor, impl Fn() -> std::future::Ready<Sample> + Send + Sync + Clone, std::future::Ready<Sample>>
    {
        Scenario::builder()
            .name("test")
            .action(instant_ok())
            .executor(executor)
            .build()
    }

    #[tokio::test(start_paused = true)]
    async fn collects_users_times_iterations_samples() {
        let scenario = scenario_with(
            PacedExecutor::builder()
                .users(32)
                .iterations(4)
                .interval(Duration::from_millis(10))
                .build(),
        );
        let set = scenario.run().await.unwrap();
        assert_eq!(set.len(), 32 * 4);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_iterations_perform_no_invocations() {
        let scenario = scenario_with(PacedExecutor::builder().users(8).iterations(0).build());
        let set = scenario.run().await.unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn every_status_is_protocol_or_sentinel() {
        let calls = Arc::new(AtomicUsize::new(0));
        let action = {
            let calls = calls.clone();
            move || {
                let n = calls.fetch_add(1, Ordering::Relaxed);
                let sample = if n % 3 == 0 {
                    Sample::unclassified(Duration::from_millis(2))
                } else {
                    Sample::new(0, Duration::from_millis(2))
                };
                std::future::ready(sample)
            }
        };
        let scenario = Scenario::builder()
            .name("statuses")
            .action(action)
            .executor(
                PacedExecutor::builder()
                    .users(9)
                    .iterations(3)
                    .interval(Duration::from_millis(5))
                    .build(),
            )
            .build();
        let set = scenario.run().await.unwrap();
        assert_eq!(set.len(), 27);
        assert!(
            set.iter()
                .all(|s| s.status == 0 || s.status == Sample::UNCLASSIFIED)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn thousands_of_users_lose_nothing() {
        let scenario = scenario_with(
            PacedExecutor::builder()
                .users(2000)
                .iterations(3)
                .interval(Duration::from_millis(50))
                .build(),
        );
        let set = scenario.run().await.unwrap();
        assert_eq!(set.len(), 6000);
    }

    #[tokio::test(start_paused = true)]
    async fn pacing_is_tick_bound_not_request_bound() {
        let (tx, mut rx) = mpsc::channel(64);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let interval = Duration::from_millis(100);

        let started = Instant::now();
        run_user(shutdown_rx, 5, interval, instant_ok(), tx).await;
        let elapsed = started.elapsed();

        // Five instant invocations still span four full intervals.
        assert!(elapsed >= interval * 4, "elapsed only {elapsed:?}");
        rx.close();
        let mut count = 0;
        while rx.recv().await.is_some() {
            count += 1;
        }
        assert_eq!(count, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_before_start_yields_no_samples() {
        let (tx, mut rx) = mpsc::channel(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        shutdown_tx.send(true).unwrap();

        run_user(
            shutdown_rx,
            10,
            Duration::from_millis(10),
            instant_ok(),
            tx,
        )
        .await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_after_k_iterations_yields_at_most_k_samples() {
        let (tx, mut rx) = mpsc::channel(64);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let shutdown_tx = Arc::new(shutdown_tx);
        let calls = Arc::new(AtomicUsize::new(0));

        let action = {
            let calls = calls.clone();
            let shutdown_tx = shutdown_tx.clone();
            move || {
                // Cancel from inside the third invocation; the driver must
                // stop at its next decision point without a fourth call.
                if calls.fetch_add(1, Ordering::Relaxed) + 1 == 3 {
                    let _ = shutdown_tx.send(true);
                }
                std::future::ready(Sample::new(0, Duration::from_millis(1)))
            }
        };

        run_user(shutdown_rx, 10, Duration::from_secs(60), action, tx).await;

        assert_eq!(calls.load(Ordering::Relaxed), 3);
        let mut received = 0;
        rx.close();
        while rx.recv().await.is_some() {
            received += 1;
        }
        assert!(received <= 3, "driver published {received} samples after cancel at 3");
    }

    #[tokio::test(start_paused = true)]
    async fn summary_follows_a_complete_run() {
        let scenario = scenario_with(
            PacedExecutor::builder()
                .users(10)
                .iterations(2)
                .interval(Duration::from_millis(10))
                .build(),
        );
        let set = scenario.run().await.unwrap();
        let summary = crate::stats::Summary::try_from(&set).unwrap();
        assert_eq!(summary.count, 20);
        assert_eq!(summary.p95_ms, 1.0);
    }

    #[tokio::test]
    async fn spawns_expected_number_of_users() {
        let (tx, _rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let handles = spawn_users(
            shutdown_rx,
            10,
            0,
            Duration::from_millis(1),
            instant_ok(),
            tx,
        );
        assert_eq!(handles.len(), 10);
        for handle in handles {
            handle.await.unwrap();
        }
    }
}
