use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::job::JobId;

/// A job lifecycle event with its emission timestamp.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobEvent {
    pub job: JobId,
    pub timestamp: DateTime<Utc>,
    pub payload: JobEventPayload,
}

impl JobEvent {
    pub fn new(job: JobId, payload: JobEventPayload) -> Self {
        Self {
            job,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Payload emitted at each job lifecycle transition.
///
/// Events from the producer task arrive in producer order (`Started`, then
/// each `PageSpooled`, then `SpoolClosed`, then `Finished`) and events from
/// the consumer task arrive in consumer order (`PageProcessed` ascending,
/// then `Drained`); the two streams interleave arbitrarily except that
/// `Drained` always precedes `Finished`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub enum JobEventPayload {
    /// Producer registered the job and is about to spool.
    Started { pages: u32 },
    /// Producer enqueued the page at `index`.
    PageSpooled { index: u32 },
    /// Producer marked the job finished and sealed the queue.
    SpoolClosed,
    /// Consumer processed the page at `index`.
    PageProcessed { index: u32 },
    /// Consumer exited its draining loop.
    Drained { processed: u64 },
    /// Producer observed the consumer's exit and reported completion.
    Finished {
        pages_spooled: u32,
        pages_processed: u64,
    },
}

/// In-process lifecycle event bus over a tokio broadcast channel.
///
/// Publishing never blocks: with no subscribers the event is silently
/// dropped, and a lagging subscriber sees `RecvError::Lagged` without
/// slowing the publisher.
#[derive(Debug)]
pub struct InProcEventBus {
    sender: broadcast::Sender<JobEvent>,
    capacity: usize,
}

impl InProcEventBus {
    /// Create a bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender, capacity }
    }

    /// Broadcast an event to all active subscribers.
    pub fn publish(&self, event: JobEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
