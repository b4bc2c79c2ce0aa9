//! Tracing instrumentation for spool.
//!
//! Helper functions for creating spans and recording job lifecycle events.
//! All output goes through `tracing`; any subscriber (or none) may be
//! installed by the embedding application.

use tracing::{info_span, Span};

use crate::job::JobId;

/// Span covering one job's producer task, from launch to report.
#[must_use]
pub fn job_span(job: JobId) -> Span {
    info_span!("spool.job", job = %job)
}

/// Span covering one job's consumer (drain) task.
#[must_use]
pub fn drain_span(job: JobId) -> Span {
    info_span!("spool.drain", job = %job)
}

/// Record that the producer enqueued a page.
pub fn record_page_spooled(job: JobId, index: u32) {
    tracing::info!(job = %job, page = index, "page spooled");
}

/// Record that the consumer processed a page.
pub fn record_page_processed(job: JobId, index: u32, label: &str) {
    tracing::info!(job = %job, page = index, label = %label, "page processed");
}

/// Record that a job completed: producer joined its consumer and reported.
pub fn record_job_completed(job: JobId, pages_spooled: u32, pages_processed: u64) {
    tracing::info!(
        job = %job,
        pages_spooled,
        pages_processed,
        "job completed"
    );
}
