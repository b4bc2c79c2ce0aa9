use serde::{Deserialize, Serialize};

/// What the driving routine does with a launched batch.
///
/// The reference behavior launches and forgets; making the choice explicit
/// keeps process-exit semantics a configuration decision instead of an
/// accident of task scheduling.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CompletionPolicy {
    /// Return tickets immediately; background jobs may still be running
    /// when the launching call returns.
    FireAndForget,
    /// Join every job before returning, yielding the completed reports.
    AwaitAll,
}

/// Configuration for the spool orchestrator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Jobs launched by one batch call.
    pub jobs_per_batch: u32,
    /// Simulated pages spooled per job.
    pub pages_per_job: u32,
    /// Inclusive upper bound, in time units, of the producer's simulated
    /// per-page fetch latency.
    pub fetch_delay_units: u32,
    /// Inclusive upper bound, in time units, of the consumer's simulated
    /// per-page processing latency.
    pub process_delay_units: u32,
    /// Batch completion semantics.
    pub completion: CompletionPolicy,
    /// Buffer capacity of the lifecycle event bus.
    pub event_capacity: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            jobs_per_batch: 4,
            pages_per_job: 10,
            fetch_delay_units: 4,
            process_delay_units: 9,
            completion: CompletionPolicy::FireAndForget,
            event_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_batch() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.jobs_per_batch, 4);
        assert_eq!(config.pages_per_job, 10);
        assert_eq!(config.fetch_delay_units, 4);
        assert_eq!(config.process_delay_units, 9);
        assert_eq!(config.completion, CompletionPolicy::FireAndForget);
    }
}
