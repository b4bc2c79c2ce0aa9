use async_trait::async_trait;
use parking_lot::Mutex;
use spool::{JobId, Page, PageSink};
use std::sync::Arc;

/// Sink that records every processed page for later assertions.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pages: Arc<Mutex<Vec<Page>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All processed pages, in processing order across jobs.
    pub fn pages(&self) -> Vec<Page> {
        self.pages.lock().clone()
    }

    /// Pages processed for one job, in processing order.
    pub fn pages_for(&self, job: JobId) -> Vec<Page> {
        self.pages
            .lock()
            .iter()
            .filter(|page| page.job == job)
            .cloned()
            .collect()
    }

    /// Labels processed for one job, in processing order.
    pub fn labels_for(&self, job: JobId) -> Vec<String> {
        self.pages_for(job)
            .into_iter()
            .map(|page| page.label)
            .collect()
    }

    pub fn processed_count(&self) -> usize {
        self.pages.lock().len()
    }

    pub fn assert_processed_count_eq(&self, expected: usize) {
        let actual = self.processed_count();
        assert_eq!(
            actual, expected,
            "Expected {} processed pages, got {}",
            expected, actual
        );
    }

    pub fn clear(&self) {
        self.pages.lock().clear();
    }
}

#[async_trait]
impl PageSink for RecordingSink {
    async fn process(&self, page: &Page) -> anyhow::Result<()> {
        self.pages.lock().push(page.clone());
        Ok(())
    }
}

/// Sink that fails every page of one job and records the rest.
///
/// Exercises job isolation: the poisoned job's drain errors while its
/// siblings complete normally.
#[derive(Clone)]
pub struct FailingSink {
    fail_job: JobId,
    recorded: RecordingSink,
}

impl FailingSink {
    pub fn new(fail_job: JobId) -> Self {
        Self {
            fail_job,
            recorded: RecordingSink::new(),
        }
    }

    /// The recording side, covering all jobs other than the failing one.
    pub fn recorded(&self) -> &RecordingSink {
        &self.recorded
    }
}

#[async_trait]
impl PageSink for FailingSink {
    async fn process(&self, page: &Page) -> anyhow::Result<()> {
        if page.job == self.fail_job {
            anyhow::bail!("injected failure for job {}", page.job);
        }
        self.recorded.process(page).await
    }
}
