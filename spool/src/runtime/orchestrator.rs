use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::Instrument;

use crate::config::{CompletionPolicy, OrchestratorConfig};
use crate::events::{InProcEventBus, JobEvent};
use crate::job::{JobId, JobReport};
use crate::latency::LatencySampler;
use crate::registry::JobRegistry;
use crate::sink::PageSink;
use crate::telemetry;

use super::builder::OrchestratorBuilder;
use super::producer;

/// Handle to one launched job.
///
/// Launching is non-blocking; the ticket is the explicit awaitable for the
/// job's outcome. Dropping it detaches the job, which runs to completion
/// on its own.
#[derive(Debug)]
pub struct JobTicket {
    job: JobId,
    pages: u32,
    handle: tokio::task::JoinHandle<anyhow::Result<JobReport>>,
}

impl JobTicket {
    pub fn job(&self) -> JobId {
        self.job
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }

    /// Whether the job's producer task has exited (successfully or not).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the job to complete and return its report.
    ///
    /// A panic inside the job surfaces here as an error on this ticket
    /// only; other jobs are unaffected.
    pub async fn join(self) -> anyhow::Result<JobReport> {
        match self.handle.await {
            Ok(report) => report,
            Err(err) => anyhow::bail!("job {} task failed: {}", self.job, err),
        }
    }
}

/// Result of a batch launch under the configured completion policy.
#[derive(Debug)]
pub enum BatchOutcome {
    /// Jobs are running in the background; tickets are still joinable.
    Detached(Vec<JobTicket>),
    /// Every job was joined; reports are in launch order.
    Completed(Vec<JobReport>),
}

/// Launches jobs and hands out tickets.
///
/// Allocates sequential job ids from a shared counter and spawns one
/// producer task per job without waiting for any of them; each producer
/// spawns and later joins its own consumer. Jobs share nothing except the
/// registry handle, so they interleave arbitrarily and fail independently.
pub struct Orchestrator {
    config: OrchestratorConfig,
    registry: JobRegistry,
    sink: Arc<dyn PageSink>,
    latency: Arc<dyn LatencySampler>,
    events: Arc<InProcEventBus>,
    next_job: AtomicU64,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("registered_jobs", &self.registry.len())
            .field("next_job", &self.next_job.load(Ordering::SeqCst))
            .field("event_subscribers", &self.events.subscriber_count())
            .finish()
    }
}

impl Orchestrator {
    /// Orchestrator with default sink, latency source, and a fresh registry.
    pub fn new(config: OrchestratorConfig) -> Self {
        Self::builder(config).build()
    }

    /// Builder for injecting a registry, sink, or latency source.
    pub fn builder(config: OrchestratorConfig) -> OrchestratorBuilder {
        OrchestratorBuilder::new(config)
    }

    pub(crate) fn from_parts(
        config: OrchestratorConfig,
        registry: JobRegistry,
        sink: Arc<dyn PageSink>,
        latency: Arc<dyn LatencySampler>,
    ) -> Self {
        let events = Arc::new(InProcEventBus::new(config.event_capacity));
        Self {
            config,
            registry,
            sink,
            latency,
            events,
            next_job: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Subscribe to lifecycle events for all jobs launched here.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.events.subscribe()
    }

    /// Launch one job of `pages` pages and return immediately.
    pub fn launch_job(&self, pages: u32) -> JobTicket {
        let job = JobId(self.next_job.fetch_add(1, Ordering::SeqCst));
        tracing::info!(job = %job, pages, "launching job");

        let handle = tokio::spawn(
            producer::run_job(
                job,
                pages,
                self.registry.clone(),
                Arc::clone(&self.sink),
                Arc::clone(&self.latency),
                Arc::clone(&self.events),
                self.config.clone(),
            )
            .instrument(telemetry::job_span(job)),
        );

        JobTicket { job, pages, handle }
    }

    /// Launch the configured batch without waiting for any job.
    pub fn launch_batch(&self) -> Vec<JobTicket> {
        (0..self.config.jobs_per_batch)
            .map(|_| self.launch_job(self.config.pages_per_job))
            .collect()
    }

    /// Launch the configured batch and apply the completion policy.
    ///
    /// `FireAndForget` returns the detached tickets at once. `AwaitAll`
    /// joins every ticket (even after a failure, so no job is left
    /// unobserved) and returns the reports, or the first error.
    pub async fn run_batch(&self) -> anyhow::Result<BatchOutcome> {
        let tickets = self.launch_batch();
        match self.config.completion {
            CompletionPolicy::FireAndForget => {
                tracing::info!(jobs = tickets.len(), "batch launched; not waiting");
                Ok(BatchOutcome::Detached(tickets))
            }
            CompletionPolicy::AwaitAll => {
                let mut reports = Vec::with_capacity(tickets.len());
                let mut first_error = None;
                for ticket in tickets {
                    match ticket.join().await {
                        Ok(report) => reports.push(report),
                        Err(err) => {
                            tracing::warn!("job failed during batch: {}", err);
                            if first_error.is_none() {
                                first_error = Some(err);
                            }
                        }
                    }
                }
                match first_error {
                    Some(err) => Err(err),
                    None => Ok(BatchOutcome::Completed(reports)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latency::LatencySampler;
    use std::time::Duration;
    use tokio::time::timeout;

    struct NoDelay;

    impl LatencySampler for NoDelay {
        fn sample(&self, _max_units: u32) -> Duration {
            Duration::ZERO
        }
    }

    fn fast_orchestrator(config: OrchestratorConfig) -> Orchestrator {
        Orchestrator::builder(config)
            .with_latency(Arc::new(NoDelay))
            .build()
    }

    #[tokio::test]
    async fn test_job_ids_are_sequential_from_one() {
        let orchestrator = fast_orchestrator(OrchestratorConfig::default());
        let t1 = orchestrator.launch_job(0);
        let t2 = orchestrator.launch_job(0);
        let t3 = orchestrator.launch_job(0);

        assert_eq!(t1.job(), JobId(1));
        assert_eq!(t2.job(), JobId(2));
        assert_eq!(t3.job(), JobId(3));

        for ticket in [t1, t2, t3] {
            timeout(Duration::from_secs(5), ticket.join())
                .await
                .expect("job did not complete")
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_await_all_returns_reports_in_launch_order() {
        let config = OrchestratorConfig {
            jobs_per_batch: 3,
            pages_per_job: 2,
            completion: CompletionPolicy::AwaitAll,
            ..OrchestratorConfig::default()
        };
        let orchestrator = fast_orchestrator(config);

        let outcome = timeout(Duration::from_secs(5), orchestrator.run_batch())
            .await
            .expect("batch did not complete")
            .unwrap();

        let BatchOutcome::Completed(reports) = outcome else {
            panic!("expected completed batch");
        };
        let jobs: Vec<JobId> = reports.iter().map(|r| r.job).collect();
        assert_eq!(jobs, vec![JobId(1), JobId(2), JobId(3)]);
        assert!(reports.iter().all(|r| r.pages_processed == 2));
    }

    #[tokio::test]
    async fn test_fire_and_forget_returns_detached_tickets() {
        let config = OrchestratorConfig {
            jobs_per_batch: 2,
            pages_per_job: 1,
            ..OrchestratorConfig::default()
        };
        let orchestrator = fast_orchestrator(config);

        let outcome = orchestrator.run_batch().await.unwrap();
        let BatchOutcome::Detached(tickets) = outcome else {
            panic!("expected detached batch");
        };
        assert_eq!(tickets.len(), 2);

        for ticket in tickets {
            timeout(Duration::from_secs(5), ticket.join())
                .await
                .expect("detached job did not complete")
                .unwrap();
        }
    }
}
