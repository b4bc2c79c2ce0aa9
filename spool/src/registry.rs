use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::job::JobId;

/// Registry of per-job "producer finished" flags.
///
/// Cloneable handle over shared state; clone it into each task that needs
/// it rather than reaching for a process-wide global. The producer for a
/// job is the only writer of its flag, the paired consumer the only reader.
/// Each flag is an atomic with SeqCst ordering, so a `mark_finished` store
/// is visible to any subsequent `is_finished` load on another thread.
///
/// Missing-id lookups are programming errors, not runtime conditions: they
/// panic, which terminates the offending task only.
#[derive(Clone, Default, Debug)]
pub struct JobRegistry {
    inner: Arc<Mutex<HashMap<JobId, Arc<AtomicBool>>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `job` with its flag initialized to false.
    ///
    /// Must be called before any consumer reads the flag for this id.
    ///
    /// # Errors
    ///
    /// Fails if the id is already registered.
    pub fn start(&self, job: JobId) -> anyhow::Result<()> {
        let mut guard = self.inner.lock();
        if guard.contains_key(&job) {
            anyhow::bail!("job {} is already registered", job);
        }
        guard.insert(job, Arc::new(AtomicBool::new(false)));
        Ok(())
    }

    /// Mark `job`'s producer as finished. Idempotent.
    ///
    /// # Panics
    ///
    /// Panics if the id was never registered.
    pub fn mark_finished(&self, job: JobId) {
        self.flag(job).store(true, Ordering::SeqCst);
    }

    /// Whether `job`'s producer has finished enqueueing.
    ///
    /// # Panics
    ///
    /// Panics if the id was never registered.
    pub fn is_finished(&self, job: JobId) -> bool {
        self.flag(job).load(Ordering::SeqCst)
    }

    /// Reclaim the entry for `job` once both tasks have exited.
    ///
    /// Returns whether an entry was removed.
    pub fn remove(&self, job: JobId) -> bool {
        self.inner.lock().remove(&job).is_some()
    }

    /// Number of currently registered jobs.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    fn flag(&self, job: JobId) -> Arc<AtomicBool> {
        let guard = self.inner.lock();
        guard
            .get(&job)
            .cloned()
            .unwrap_or_else(|| panic!("job {} is not registered", job))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_then_mark_finished() {
        let registry = JobRegistry::new();
        registry.start(JobId(1)).unwrap();
        assert!(!registry.is_finished(JobId(1)));

        registry.mark_finished(JobId(1));
        assert!(registry.is_finished(JobId(1)));

        // Idempotent.
        registry.mark_finished(JobId(1));
        assert!(registry.is_finished(JobId(1)));
    }

    #[test]
    fn test_duplicate_start_is_an_error() {
        let registry = JobRegistry::new();
        registry.start(JobId(1)).unwrap();
        assert!(registry.start(JobId(1)).is_err());
    }

    #[test]
    fn test_flags_are_per_job() {
        let registry = JobRegistry::new();
        registry.start(JobId(1)).unwrap();
        registry.start(JobId(2)).unwrap();

        registry.mark_finished(JobId(1));
        assert!(registry.is_finished(JobId(1)));
        assert!(!registry.is_finished(JobId(2)));
    }

    #[test]
    fn test_remove_reclaims_entry() {
        let registry = JobRegistry::new();
        registry.start(JobId(1)).unwrap();
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(JobId(1)));
        assert!(!registry.remove(JobId(1)));
        assert!(registry.is_empty());
    }

    #[test]
    #[should_panic(expected = "job 9 is not registered")]
    fn test_unregistered_read_panics() {
        let registry = JobRegistry::new();
        registry.is_finished(JobId(9));
    }

    #[test]
    fn test_clones_share_state() {
        let registry = JobRegistry::new();
        let clone = registry.clone();

        registry.start(JobId(1)).unwrap();
        clone.mark_finished(JobId(1));
        assert!(registry.is_finished(JobId(1)));
    }
}
