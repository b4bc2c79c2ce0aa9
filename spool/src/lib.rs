//! Spool - per-job page spooling with paired producer/consumer draining.
//!
//! A foundational crate for the coordination pattern where a foreground
//! producer emits an ordered sequence of pages into a per-job queue, a
//! background consumer drains that queue asynchronously, and the producer
//! reports completion only after the consumer has fully drained.
//!
//! # Core Concepts
//!
//! - **Job**: one end-to-end paginated request, identified by a sequential
//!   [`JobId`] and owning exactly one producer/consumer pair.
//!
//! - **Queue**: the [`PageQueue`], an unbounded FIFO channel scoped to one
//!   job. The producer seals it after the final page so a parked consumer
//!   always wakes.
//!
//! - **Registry**: the [`JobRegistry`] holds each job's "producer finished"
//!   flag. Together with an empty-queue observation it forms the consumer's
//!   two-condition termination predicate.
//!
//! - **Sink**: the [`PageSink`] trait is the processing seam; the default
//!   [`TracingSink`] logs each drained page.
//!
//! - **Events**: the [`InProcEventBus`] broadcasts [`JobEvent`]s for every
//!   lifecycle transition, for observability and tests.
//!
//! - **Runtime**: the [`runtime::Orchestrator`] allocates job ids, launches
//!   producer tasks, and returns [`runtime::JobTicket`] handles.
//!
//! # Example
//!
//! ```ignore
//! use spool::{OrchestratorConfig, runtime::Orchestrator};
//!
//! let orchestrator = Orchestrator::new(OrchestratorConfig::default());
//! let ticket = orchestrator.launch_job(10);
//! // ... the launching call returned immediately; join when you care:
//! let report = ticket.join().await?;
//! ```

/// Orchestrator configuration and the batch completion policy.
pub mod config;

/// Job lifecycle events and the in-process broadcast bus.
pub mod events;

/// Core job types: [`JobId`], [`Page`], [`JobReport`].
pub mod job;

/// Simulated latency sources.
///
/// The `latency` module defines the [`LatencySampler`] seam used by both
/// the producer (per-page fetch latency) and the consumer (per-page
/// processing latency), plus the production [`RandomLatency`] sampler.
pub mod latency;

/// Per-job unbounded FIFO queue with close semantics.
pub mod queue;

/// Per-job producer-finished flags.
///
/// The `registry` module provides [`JobRegistry`], an injected, cloneable
/// handle; its flag plus an empty-queue check is the consumer's
/// termination condition.
pub mod registry;

/// Page processing sinks.
pub mod sink;

/// Tracing span helpers and lifecycle record functions.
pub mod telemetry;

/// Job launch and completion runtime.
///
/// The `runtime` module provides the [`runtime::Orchestrator`], the
/// [`runtime::OrchestratorBuilder`], and the [`runtime::JobTicket`]
/// handle returned by non-blocking launches.
pub mod runtime;

pub use config::*;
pub use events::*;
pub use job::*;
pub use latency::*;
pub use queue::*;
pub use registry::*;
pub use sink::*;
