use std::sync::Arc;

use log::trace;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounds the number of requests in flight against one node.
///
/// The node processes RPC work through a queue of fixed depth and answers
/// "Work queue depth exceeded" once it is full, so the client keeps its own
/// concurrency at or below that depth. Waiters are served in FIFO order.
#[derive(Debug, Clone)]
pub struct AdmissionQueue {
    slots: Arc<Semaphore>,
    capacity: usize,
}

/// A held admission slot. The slot returns to the pool when this is dropped,
/// on every exit path of the request that holds it.
#[derive(Debug)]
pub struct AdmissionSlot {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionQueue {
    /// Capacity is clamped to `1..=Semaphore::MAX_PERMITS`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    pub fn in_flight(&self) -> usize {
        self.capacity - self.available()
    }

    /// Waits for a free slot. Returns `None` only if the queue was closed.
    pub async fn acquire(&self) -> Option<AdmissionSlot> {
        if self.slots.available_permits() == 0 {
            trace!(capacity = self.capacity; "RPC: queued, waiting for an admission slot");
        }
        let permit = Arc::clone(&self.slots).acquire_owned().await.ok()?;
        Some(AdmissionSlot { _permit: permit })
    }

    /// Closes the queue. Pending and future acquisitions return `None`;
    /// slots already held stay valid until dropped.
    pub fn close(&self) {
        self.slots.close();
    }

    pub fn is_closed(&self) -> bool {
        self.slots.is_closed()
    }
}
