use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;
use volley::{PacedExecutor, Reporter, Sample, Scenario, StdoutReporter, Summary};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // The payload is opaque bytes; swap in whatever the target expects.
    let payload = std::fs::read("payload.bin").unwrap_or_else(|_| vec![0u8; 64 * 1024]);

    // One long-lived client shared by every user; its connection pool
    // multiplexes all concurrent exchanges. NEVER instantiate clients inside
    // the action unless you want to kill performance.
    let client = reqwest::Client::new();

    let set = Scenario::builder()
        .name("HTTP scenario")
        .action(move || {
            let client = client.clone();
            let payload = payload.clone();
            async move {
                // One exchange: send the payload, await the terminal
                // response, classify. The clock covers exactly that — it is
                // stopped before the sample is handed back for publishing.
                let start = Instant::now();
                let res = client
                    .post("http://localhost:3000/hash")
                    .body(payload)
                    .send()
                    .await;
                let latency = start.elapsed();
                match res {
                    Ok(r) => Sample::new(r.status().as_u16() as i32, latency),
                    Err(_) => Sample::unclassified(latency),
                }
            }
        })
        .executor(
            PacedExecutor::builder()
                .users(10_000)
                .iterations(4)
                .interval(Duration::from_secs(1))
                .build(),
        )
        .build()
        .run()
        .await
        .unwrap();

    let summary = Summary::try_from(&set).unwrap();
    StdoutReporter.report(&summary).await.unwrap();
}
