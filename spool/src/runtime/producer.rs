use anyhow::Context;
use std::sync::Arc;
use tracing::Instrument;

use crate::config::OrchestratorConfig;
use crate::events::{InProcEventBus, JobEvent, JobEventPayload};
use crate::job::{JobId, JobReport, Page};
use crate::latency::LatencySampler;
use crate::queue::PageQueue;
use crate::registry::JobRegistry;
use crate::sink::PageSink;
use crate::telemetry;

use super::consumer;

/// Run one job end to end: spool `pages` ordered pages into a fresh queue
/// while a background consumer drains it, then report completion once the
/// consumer has exited.
///
/// Failures are fatal to this job only. The queue is sealed and the
/// consumer joined even on the error paths, so a failed job never leaks a
/// parked drain task.
pub(crate) async fn run_job(
    job: JobId,
    pages: u32,
    registry: JobRegistry,
    sink: Arc<dyn PageSink>,
    latency: Arc<dyn LatencySampler>,
    events: Arc<InProcEventBus>,
    config: OrchestratorConfig,
) -> anyhow::Result<JobReport> {
    tracing::info!(job = %job, pages, "job started");

    let queue = PageQueue::new();
    registry.start(job)?;
    events.publish(JobEvent::new(job, JobEventPayload::Started { pages }));

    // Fire-and-forget spawn; the handle is joined after spooling ends.
    let drain = tokio::spawn(
        consumer::drain(
            queue.clone(),
            job,
            registry.clone(),
            Arc::clone(&sink),
            Arc::clone(&latency),
            Arc::clone(&events),
            config.process_delay_units,
        )
        .instrument(telemetry::drain_span(job)),
    );

    let mut spool_error = None;
    for index in 0..pages {
        let page = Page::new(job, index);
        if let Err(err) = queue.enqueue(page) {
            spool_error = Some(err);
            break;
        }
        telemetry::record_page_spooled(job, index);
        events.publish(JobEvent::new(job, JobEventPayload::PageSpooled { index }));

        // Simulated fetch latency before the next page, drawn independently
        // per iteration.
        tokio::time::sleep(latency.sample(config.fetch_delay_units)).await;
    }

    // Order matters: the flag goes up before the queue seals, so any exit
    // of the drain loop observes the job as finished.
    registry.mark_finished(job);
    queue.close();
    events.publish(JobEvent::new(job, JobEventPayload::SpoolClosed));
    tracing::info!(job = %job, "spooling finished; waiting for drain");

    let drain_result = drain.await;
    registry.remove(job);

    if let Some(err) = spool_error {
        return Err(err).with_context(|| format!("job {} aborted while spooling", job));
    }

    let pages_processed = match drain_result {
        Ok(Ok(processed)) => processed,
        Ok(Err(err)) => {
            return Err(err).with_context(|| format!("job {} drain failed", job));
        }
        Err(err) => {
            anyhow::bail!("drain task for job {} panicked or was cancelled: {}", job, err);
        }
    };

    let report = JobReport {
        job,
        pages_spooled: pages,
        pages_processed,
    };
    telemetry::record_job_completed(job, pages, pages_processed);
    events.publish(JobEvent::new(
        job,
        JobEventPayload::Finished {
            pages_spooled: pages,
            pages_processed,
        },
    ));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::TracingSink;
    use std::time::Duration;
    use tokio::time::timeout;

    struct NoDelay;

    impl LatencySampler for NoDelay {
        fn sample(&self, _max_units: u32) -> Duration {
            Duration::ZERO
        }
    }

    fn fast_config() -> OrchestratorConfig {
        OrchestratorConfig::default()
    }

    #[tokio::test]
    async fn test_run_job_reports_all_pages() {
        let registry = JobRegistry::new();
        let report = timeout(
            Duration::from_secs(5),
            run_job(
                JobId(1),
                3,
                registry.clone(),
                Arc::new(TracingSink),
                Arc::new(NoDelay),
                Arc::new(InProcEventBus::new(64)),
                fast_config(),
            ),
        )
        .await
        .expect("job did not complete")
        .unwrap();

        assert_eq!(report.job, JobId(1));
        assert_eq!(report.pages_spooled, 3);
        assert_eq!(report.pages_processed, 3);
        // Entry reclaimed after the join.
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_run_job_with_zero_pages() {
        let report = timeout(
            Duration::from_secs(5),
            run_job(
                JobId(1),
                0,
                JobRegistry::new(),
                Arc::new(TracingSink),
                Arc::new(NoDelay),
                Arc::new(InProcEventBus::new(64)),
                fast_config(),
            ),
        )
        .await
        .expect("empty job did not terminate")
        .unwrap();

        assert_eq!(report.pages_spooled, 0);
        assert_eq!(report.pages_processed, 0);
    }

    #[tokio::test]
    async fn test_duplicate_job_id_fails_before_spawning() {
        let registry = JobRegistry::new();
        registry.start(JobId(1)).unwrap();

        let result = run_job(
            JobId(1),
            3,
            registry,
            Arc::new(TracingSink),
            Arc::new(NoDelay),
            Arc::new(InProcEventBus::new(64)),
            fast_config(),
        )
        .await;
        assert!(result.is_err());
    }
}
