//! RecordingTransaction: a TransactionContext that only collects.

use crate::error::TransactionError;
use crate::id::TransactionId;
use crate::lifecycle::LifecycleEvent;
use crate::transaction::TransactionContext;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Collects recorded events with no commit semantics. Can be closed to
/// simulate a transaction that ended underneath an interaction, or made to
/// refuse records while still reporting itself active, as one that ends
/// between the check and the record would.
pub struct RecordingTransaction {
    id: TransactionId,
    active: AtomicBool,
    refusing: AtomicBool,
    events: Mutex<Vec<LifecycleEvent>>,
}

impl RecordingTransaction {
    /// An active transaction named `id`.
    pub fn new(id: impl Into<TransactionId>) -> Self {
        Self {
            id: id.into(),
            active: AtomicBool::new(true),
            refusing: AtomicBool::new(false),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Refuse further events.
    pub fn close(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    /// Stay active but fail every further `record` with `NotActive`.
    pub fn refuse_records(&self) {
        self.refusing.store(true, Ordering::SeqCst);
    }

    /// Snapshot of recorded events.
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl TransactionContext for RecordingTransaction {
    fn id(&self) -> &TransactionId {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn record(&self, mut event: LifecycleEvent) -> Result<u64, TransactionError> {
        if !self.is_active() || self.refusing.load(Ordering::SeqCst) {
            return Err(TransactionError::NotActive(self.id.clone()));
        }
        let mut events = self.events.lock().unwrap();
        let sequence = events.len() as u64 + 1;
        event.transaction = Some(self.id.clone());
        event.sequence = sequence;
        events.push(event);
        Ok(sequence)
    }
}
