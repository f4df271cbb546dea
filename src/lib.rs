//! Volley — a small fixed-pace load-generation engine.
//!
//! Volley drives many independent virtual users against a remote service.
//! Each user runs a bounded iteration loop paced on fixed tick boundaries:
//! invoke an exchange, publish its outcome, wait for the next tick. Outcomes
//! from all users flow through one multi-producer/single-consumer channel into
//! a single collector, and the merged set is summarized into count and
//! interpolated 95th-percentile latency afterwards.
//!
//! # Architecture
//!
//! The main building blocks are:
//!
//! - [`Scenario`]: glue that ties everything together — a name, the action
//!   being measured, and the executor that drives it.
//! - [`Executor`]: responsible for actually running the scenario. The built-in
//!   [`PacedExecutor`] spawns a fixed pool of virtual users, each pacing its
//!   own loop; executors are replaceable.
//! - [`Sample`]: the smallest unit produced by an action — one exchange's
//!   status and latency. An action must always resolve to a `Sample`,
//!   classifying failures into the sentinel status instead of propagating.
//! - [`SampleSet`]: the ordered result set, exclusively owned by the
//!   collector while the run is live.
//! - [`Summary`]: count and interpolated p95 derived from a finished set.
//! - [`Reporter`]: consumes a `Summary` and sends it somewhere (stdout, JSON).
//!
//! # Pacing model
//!
//! Tick boundaries are multiples of the interval measured from each user's
//! loop start, independent of response latency. An invocation that overruns
//! its interval delays only itself: the next one starts immediately, without
//! catch-up bursts and without dropping iterations. Shutdown is a completion
//! protocol — users are joined, the publish channel closes, the collector
//! drains — never a timer.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::{Duration, Instant};
//!
//! use volley::{PacedExecutor, Reporter, Sample, Scenario, StdoutReporter, Summary};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Build heavy things like clients once, outside the action.
//!     let client = reqwest::Client::new();
//!     let set = Scenario::builder()
//!         .name("http")
//!         .action(move || {
//!             let client = client.clone();
//!             async move {
//!                 let start = Instant::now();
//!                 let res = client.post("http://localhost:3000").body("ping").send().await;
//!                 let latency = start.elapsed();
//!                 match res {
//!                     Ok(r) => Sample::new(r.status().as_u16() as i32, latency),
//!                     Err(_) => Sample::unclassified(latency),
//!                 }
//!             }
//!         })
//!         .executor(
//!             PacedExecutor::builder()
//!                 .users(100)
//!                 .iterations(4)
//!                 .interval(Duration::from_secs(1))
//!                 .build(),
//!         )
//!         .build()
//!         .run()
//!         .await
//!         .unwrap();
//!
//!     let summary = Summary::try_from(&set).unwrap();
//!     StdoutReporter.report(&summary).await.unwrap();
//! }
//! ```

/// Single-consumer collection of published samples
pub mod collector;
/// Execution strategies that drive a scenario
pub mod executor;
/// Reports and Reporters
pub mod report;
/// Per-exchange outcomes and the run's result set
pub mod sample;
/// Main module of the engine that glues everything together
pub mod scenario;
/// Percentile statistics over a finished run
pub mod stats;

pub use executor::{Executor, PacedExecutor};
pub use report::{JsonReporter, Reporter, StdoutReporter};
pub use sample::{Sample, SampleSet};
pub use scenario::Scenario;
pub use stats::{StatsError, Summary, percentile};
