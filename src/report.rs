use async_trait::async_trait;

use crate::stats::Summary;

/// A `Reporter` consumes a [`Summary`] and performs side effects — displaying
/// it, sending it to a service, or persisting it somewhere.
///
/// Reporters are the I/O boundary: the computation layer (samples → summary)
/// stays pure and deterministic, while reporters handle presentation and
/// export.
#[async_trait]
pub trait Reporter {
    async fn report(&self, summary: &Summary) -> Result<(), Box<dyn std::error::Error>>;
}

/// Prints the summary in the engine's human-readable form.
pub struct StdoutReporter;

#[async_trait]
impl Reporter for StdoutReporter {
    async fn report(&self, summary: &Summary) -> Result<(), Box<dyn std::error::Error>> {
        println!("size: {}", summary.count);
        println!("95th percentile: {:.3}[ms]", summary.p95_ms);
        Ok(())
    }
}

/// Prints the summary as a single JSON line.
pub struct JsonReporter;

#[async_trait]
impl Reporter for JsonReporter {
    async fn report(&self, summary: &Summary) -> Result<(), Box<dyn std::error::Error>> {
        println!("{}", serde_json::to_string(summary)?);
        Ok(())
    }
}
