//! Paginated export demo: four jobs, ten pages each.
//!
//! Each job pairs a foreground producer (simulating paginated fetches of a
//! report) with a background consumer that drains and processes the pages.
//! The batch is launched fire-and-forget: the launching call returns while
//! every job is still running, and the tickets are joined afterwards so the
//! demo exits only once the background work is done.
//!
//! Run with: cargo run --example paginated_export

use std::sync::Arc;
use std::time::Duration;

use spool::runtime::{BatchOutcome, Orchestrator};
use spool::{OrchestratorConfig, RandomLatency};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Spool Paginated Export Example ===\n");

    // Reference batch: 4 jobs x 10 pages, fire-and-forget. A 200ms time
    // unit keeps the simulated fetch (0-4 units) and processing (0-9 units)
    // latencies visible without multi-second stalls.
    let config = OrchestratorConfig::default();
    let orchestrator = Orchestrator::builder(config)
        .with_latency(Arc::new(RandomLatency::new(Duration::from_millis(200))))
        .build();

    println!("1. Launching the batch...\n");
    let outcome = orchestrator.run_batch().await?;
    let BatchOutcome::Detached(tickets) = outcome else {
        unreachable!("default policy is fire-and-forget");
    };

    for ticket in &tickets {
        println!(
            "   Launched job {} ({} pages), finished: {}",
            ticket.job(),
            ticket.pages(),
            ticket.is_finished()
        );
    }

    // The launching flow is already done; everything below happens while
    // the producers and consumers are still coordinating in the background.
    println!("\n2. Finished on the launching flow; jobs still running.\n");

    println!("3. Joining tickets...\n");
    for ticket in tickets {
        let report = ticket.join().await?;
        println!(
            "   Job {} complete: {} pages spooled, {} pages processed",
            report.job, report.pages_spooled, report.pages_processed
        );
    }

    println!("\n=== Example Complete ===");
    println!("\nKey takeaways:");
    println!("- launch calls return immediately; jobs run fully concurrently");
    println!("- each producer finishes only after its consumer drained the queue");
    println!("- per-job page order is FIFO end-to-end despite randomized delays");
    println!("- switch CompletionPolicy::AwaitAll to make run_batch join for you");

    Ok(())
}
