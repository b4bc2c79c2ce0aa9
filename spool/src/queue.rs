use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::job::Page;

/// Unbounded FIFO channel of pages for exactly one job.
///
/// The producer enqueues without ever blocking; the consumer awaits
/// `dequeue`, which parks on an empty queue until a page arrives or the
/// producer closes the queue after its final enqueue. Cloning hands out
/// another handle to the same queue; one clone lives in each of the paired
/// tasks for the queue's lifetime.
///
/// There is no capacity limit and no backpressure. Unbounded growth under
/// producer/consumer imbalance is an accepted property given bounded page
/// counts.
#[derive(Clone, Debug)]
pub struct PageQueue {
    inner: Arc<PageQueueInner>,
}

#[derive(Debug)]
struct PageQueueInner {
    pages: Mutex<VecDeque<Page>>,
    closed: AtomicBool,
    notify: Notify,
}

impl PageQueue {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(PageQueueInner {
                pages: Mutex::new(VecDeque::new()),
                closed: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    /// Append a page to the tail. Never blocks.
    ///
    /// # Errors
    ///
    /// Fails once the queue has been closed.
    pub fn enqueue(&self, page: Page) -> anyhow::Result<()> {
        {
            let mut pages = self.inner.pages.lock();
            if self.inner.closed.load(Ordering::SeqCst) {
                anyhow::bail!("queue is closed; page {} rejected", page.label);
            }
            pages.push_back(page);
        }
        self.inner.notify.notify_one();
        Ok(())
    }

    /// Remove and return the head page, awaiting one if the queue is empty.
    ///
    /// Returns `None` only once the queue is closed and fully drained.
    /// `notify_one` stores a permit, so an enqueue or close that races with
    /// the park cannot be missed.
    pub async fn dequeue(&self) -> Option<Page> {
        loop {
            {
                let mut pages = self.inner.pages.lock();
                if let Some(page) = pages.pop_front() {
                    return Some(page);
                }
                if self.inner.closed.load(Ordering::SeqCst) {
                    return None;
                }
            }
            self.inner.notify.notified().await;
        }
    }

    /// Non-blocking, best-effort emptiness snapshot.
    ///
    /// May race with a concurrent enqueue; callers combine it with the
    /// producer-finished flag to decide termination.
    pub fn is_empty(&self) -> bool {
        self.inner.pages.lock().is_empty()
    }

    /// Current number of buffered pages.
    pub fn len(&self) -> usize {
        self.inner.pages.lock().len()
    }

    /// Seal the queue: no further enqueues, and a parked `dequeue` wakes.
    ///
    /// Called by the producer immediately after marking the job finished.
    pub fn close(&self) {
        {
            let _pages = self.inner.pages.lock();
            self.inner.closed.store(true, Ordering::SeqCst);
        }
        self.inner.notify.notify_one();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }
}

impl Default for PageQueue {
    fn default() -> Self {
        Self::new()
    }
}
