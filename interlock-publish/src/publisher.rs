use interlock_core::error::TransactionError;
use interlock_core::id::TransactionId;
use interlock_core::lifecycle::{LifecycleEvent, LifecycleListener};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Queue {
    events: Vec<LifecycleEvent>,
    next_sequence: u64,
}

/// Transaction-scoped queue of lifecycle events.
///
/// Events are appended as interactions succeed and reach the listeners
/// only when the owning transaction commits, in the order they were
/// recorded. Whatever happens at the end of the transaction, the queue is
/// empty afterwards.
pub struct CommitBoundPublisher {
    listeners: Vec<Arc<dyn LifecycleListener>>,
    queue: Mutex<Queue>,
}

impl CommitBoundPublisher {
    /// A publisher delivering to `listeners`, in that order.
    pub fn new(listeners: Vec<Arc<dyn LifecycleListener>>) -> Self {
        Self {
            listeners,
            queue: Mutex::new(Queue::default()),
        }
    }

    /// Append `event`, stamping it with `transaction` and the next sequence
    /// number. Concurrent appends are serialized.
    pub fn record(
        &self,
        transaction: &TransactionId,
        mut event: LifecycleEvent,
    ) -> Result<u64, TransactionError> {
        let mut queue = self.queue.lock().map_err(|_| TransactionError::Poisoned)?;
        queue.next_sequence += 1;
        event.sequence = queue.next_sequence;
        event.transaction = Some(transaction.clone());
        queue.events.push(event);
        Ok(queue.next_sequence)
    }

    /// Snapshot of the events waiting for commit.
    pub fn pending(&self) -> Vec<LifecycleEvent> {
        self.queue
            .lock()
            .map(|queue| queue.events.clone())
            .unwrap_or_default()
    }

    /// Deliver the queue to the listeners and empty it.
    ///
    /// Every listener first gets to [`prepare`](LifecycleListener::prepare)
    /// the whole batch. If any refuses, nothing is published and the flush
    /// fails with [`TransactionError::FlushAborted`]. Otherwise each event
    /// goes to each listener, in recording order. Returns the number of
    /// events published.
    pub fn flush_on_commit(&self, transaction: &TransactionId) -> Result<usize, TransactionError> {
        let batch = {
            let mut queue = self.queue.lock().map_err(|_| TransactionError::Poisoned)?;
            std::mem::take(&mut queue.events)
        };

        for listener in &self.listeners {
            if let Err(err) = listener.prepare(&batch) {
                tracing::warn!(
                    %transaction,
                    events = batch.len(),
                    error = %err,
                    "listener refused commit batch, nothing published"
                );
                return Err(TransactionError::FlushAborted {
                    transaction: transaction.clone(),
                    reason: err.to_string(),
                });
            }
        }

        for event in &batch {
            for listener in &self.listeners {
                listener.publish(event);
            }
        }
        Ok(batch.len())
    }

    /// Drop the queue unpublished. Returns how many events were dropped.
    pub fn discard_on_rollback(&self) -> usize {
        match self.queue.lock() {
            Ok(mut queue) => std::mem::take(&mut queue.events).len(),
            Err(poisoned) => std::mem::take(&mut poisoned.into_inner().events).len(),
        }
    }
}

impl std::fmt::Debug for CommitBoundPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitBoundPublisher")
            .field("listeners", &self.listeners.len())
            .field("pending", &self.pending().len())
            .finish()
    }
}
