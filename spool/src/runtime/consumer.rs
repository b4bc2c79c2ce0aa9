use anyhow::Context;
use std::sync::Arc;

use crate::events::{InProcEventBus, JobEvent, JobEventPayload};
use crate::job::JobId;
use crate::latency::LatencySampler;
use crate::queue::PageQueue;
use crate::registry::JobRegistry;
use crate::sink::PageSink;
use crate::telemetry;

/// Drain one job's queue until the producer has finished and the queue is
/// observed empty. Returns the number of pages processed.
///
/// Termination requires both conditions: a momentarily empty queue alone
/// never ends the loop while the producer is still spooling, because
/// `dequeue` parks until the next page or the close. The `None` arm is the
/// wake-up for a consumer parked across the close; the producer marks the
/// job finished before sealing the queue, so the flag is already set on
/// that path.
pub(crate) async fn drain(
    queue: PageQueue,
    job: JobId,
    registry: JobRegistry,
    sink: Arc<dyn PageSink>,
    latency: Arc<dyn LatencySampler>,
    events: Arc<InProcEventBus>,
    process_delay_units: u32,
) -> anyhow::Result<u64> {
    let mut processed = 0u64;

    while !registry.is_finished(job) || !queue.is_empty() {
        let Some(page) = queue.dequeue().await else {
            break;
        };

        sink.process(&page)
            .await
            .with_context(|| format!("processing {} failed", page.label))?;
        processed += 1;
        telemetry::record_page_processed(job, page.index, &page.label);
        events.publish(JobEvent::new(
            job,
            JobEventPayload::PageProcessed { index: page.index },
        ));

        // Simulated processing latency, drawn independently per page.
        tokio::time::sleep(latency.sample(process_delay_units)).await;
    }

    tracing::info!(job = %job, processed, "drain finished");
    events.publish(JobEvent::new(job, JobEventPayload::Drained { processed }));
    Ok(processed)
}
