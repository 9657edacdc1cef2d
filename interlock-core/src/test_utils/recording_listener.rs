//! RecordingListener: keeps every published event for inspection.

use crate::error::ListenerError;
use crate::lifecycle::{LifecycleEvent, LifecycleListener};
use std::sync::Mutex;

/// A listener that records every published event and every prepared batch
/// size. Optionally refuses every batch, to exercise aborted flushes.
pub struct RecordingListener {
    reject_with: Option<String>,
    published: Mutex<Vec<LifecycleEvent>>,
    prepared: Mutex<Vec<usize>>,
}

impl RecordingListener {
    /// A listener that accepts everything.
    pub fn new() -> Self {
        Self {
            reject_with: None,
            published: Mutex::new(Vec::new()),
            prepared: Mutex::new(Vec::new()),
        }
    }

    /// A listener that refuses every batch with `reason`.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            reject_with: Some(reason.into()),
            ..Self::new()
        }
    }

    /// Snapshot of published events, in publication order.
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.published.lock().unwrap().clone()
    }

    /// Sizes of the batches offered to `prepare`.
    pub fn prepared_batches(&self) -> Vec<usize> {
        self.prepared.lock().unwrap().clone()
    }
}

impl Default for RecordingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleListener for RecordingListener {
    fn prepare(&self, batch: &[LifecycleEvent]) -> Result<(), ListenerError> {
        self.prepared.lock().unwrap().push(batch.len());
        match &self.reject_with {
            Some(reason) => Err(ListenerError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }

    fn publish(&self, event: &LifecycleEvent) {
        self.published.lock().unwrap().push(event.clone());
    }
}
