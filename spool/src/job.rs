use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Unique identifier for one spooling job.
///
/// Ids are sequential integers handed out by the orchestrator's shared
/// counter, starting at 1. They are never reused within a process.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One ordered unit of work for a job.
///
/// Pages are produced in strictly increasing `index` order and consumed
/// exactly once, in the order they were enqueued.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// The job this page belongs to.
    pub job: JobId,
    /// Zero-based position within the job's sequence.
    pub index: u32,
    /// Formatted payload label, standing in for externally-sourced page data.
    pub label: String,
}

impl Page {
    /// Build the page at `index` for `job`, with its canonical label.
    pub fn new(job: JobId, index: u32) -> Self {
        Self {
            job,
            index,
            label: format!("Job_{}_Page_{}", job, index),
        }
    }
}

/// Summary returned by a completed job.
///
/// `pages_processed` comes from the consumer's exit value, observed by the
/// producer when it joins the drain task.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct JobReport {
    pub job: JobId,
    pub pages_spooled: u32,
    pub pages_processed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_label_format() {
        let page = Page::new(JobId(1), 0);
        assert_eq!(page.label, "Job_1_Page_0");

        let page = Page::new(JobId(42), 9);
        assert_eq!(page.label, "Job_42_Page_9");
    }

    #[test]
    fn test_job_id_display() {
        assert_eq!(JobId(7).to_string(), "7");
    }
}
