use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use crate::config::OrchestratorConfig;
use crate::latency::{LatencySampler, RandomLatency};
use crate::registry::JobRegistry;
use crate::sink::{PageSink, TracingSink};

use super::orchestrator::Orchestrator;

/// Builder for constructing an [`Orchestrator`] with explicit dependencies.
///
/// Every dependency has a production default (`TracingSink`,
/// [`RandomLatency`] at a one-second unit, a fresh [`JobRegistry`]); tests
/// inject deterministic replacements, and callers that want several
/// orchestrators sharing visibility can inject one registry into each.
///
/// # Example
///
/// ```ignore
/// use spool::runtime::Orchestrator;
/// use spool::OrchestratorConfig;
///
/// let orchestrator = Orchestrator::builder(OrchestratorConfig::default())
///     .with_registry(registry)
///     .with_sink(sink)
///     .with_latency(latency)
///     .build();
/// ```
pub struct OrchestratorBuilder {
    config: OrchestratorConfig,
    registry: Option<JobRegistry>,
    sink: Option<Arc<dyn PageSink>>,
    latency: Option<Arc<dyn LatencySampler>>,
}

impl fmt::Debug for OrchestratorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("OrchestratorBuilder");
        debug.field("config", &self.config);
        debug.field("registry_set", &self.registry.is_some());
        debug.field("sink_set", &self.sink.is_some());
        debug.field("latency_set", &self.latency.is_some());
        if let Some(sink) = &self.sink {
            debug.field("sink_type", &type_name_of_val(sink.as_ref()));
        }
        if let Some(latency) = &self.latency {
            debug.field("latency_type", &type_name_of_val(latency.as_ref()));
        }
        debug.finish()
    }
}

impl OrchestratorBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: OrchestratorConfig) -> Self {
        Self {
            config,
            registry: None,
            sink: None,
            latency: None,
        }
    }

    /// Use an existing registry instead of a fresh one.
    pub fn with_registry(mut self, registry: JobRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the page processing sink.
    pub fn with_sink(mut self, sink: Arc<dyn PageSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the simulated latency source.
    pub fn with_latency(mut self, latency: Arc<dyn LatencySampler>) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Build the orchestrator, filling unset dependencies with defaults.
    pub fn build(self) -> Orchestrator {
        let registry = self.registry.unwrap_or_default();
        let sink = self.sink.unwrap_or_else(|| Arc::new(TracingSink));
        let latency = self
            .latency
            .unwrap_or_else(|| Arc::new(RandomLatency::default()));
        Orchestrator::from_parts(self.config, registry, sink, latency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_defaults() {
        let orchestrator = OrchestratorBuilder::new(OrchestratorConfig::default()).build();
        assert_eq!(orchestrator.config().jobs_per_batch, 4);
        assert!(orchestrator.registry().is_empty());
    }

    #[test]
    fn test_injected_registry_is_shared() {
        let registry = JobRegistry::new();
        registry.start(crate::JobId(99)).unwrap();

        let orchestrator = OrchestratorBuilder::new(OrchestratorConfig::default())
            .with_registry(registry.clone())
            .build();
        assert_eq!(orchestrator.registry().len(), 1);
    }
}
