use crate::publisher::CommitBoundPublisher;
use interlock_core::context::ExecutionContext;
use interlock_core::error::{InteractionError, TransactionError};
use interlock_core::id::TransactionId;
use interlock_core::lifecycle::{LifecycleEvent, LifecycleListener};
use interlock_core::transaction::TransactionContext;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Where a transaction stands.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    /// Accepting events.
    Active,
    /// Committed; its events were published.
    Committed,
    /// Rolled back, explicitly or because its flush was refused.
    RolledBack,
}

/// What a successful commit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    /// The committed transaction.
    pub transaction: TransactionId,
    /// Events delivered to the listeners.
    pub published: usize,
}

/// A unit of work whose events are published only if it commits.
///
/// Recording and committing take the same lock, so an event is either in
/// the commit batch or refused as arriving too late. A mediated mutation
/// holds that lock from before it touches the object until its event is
/// queued. Listeners run while that lock is held too. Neither listeners nor
/// domain code called by a mutation may record into this transaction.
pub struct Transaction {
    id: TransactionId,
    state: Mutex<TransactionState>,
    publisher: CommitBoundPublisher,
}

impl Transaction {
    /// An active transaction delivering to `listeners` at commit.
    pub fn new(id: impl Into<TransactionId>, listeners: Vec<Arc<dyn LifecycleListener>>) -> Self {
        Self {
            id: id.into(),
            state: Mutex::new(TransactionState::Active),
            publisher: CommitBoundPublisher::new(listeners),
        }
    }

    /// Current state. A poisoned transaction reports itself rolled back.
    pub fn state(&self) -> TransactionState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(TransactionState::RolledBack)
    }

    /// Events waiting for commit.
    pub fn pending(&self) -> Vec<LifecycleEvent> {
        self.publisher.pending()
    }

    /// `context` bound to this transaction.
    pub fn bind(self: &Arc<Self>, context: ExecutionContext) -> ExecutionContext {
        context.with_transaction(Arc::clone(self) as Arc<dyn TransactionContext>)
    }

    /// Publish the recorded events and end the transaction.
    ///
    /// If a listener refuses the batch nothing is published, the
    /// transaction is rolled back and the refusal is returned.
    pub fn commit(&self) -> Result<CommitReport, TransactionError> {
        let mut state = self.lock_active()?;
        match self.publisher.flush_on_commit(&self.id) {
            Ok(published) => {
                *state = TransactionState::Committed;
                tracing::info!(transaction = %self.id, published, "transaction committed");
                Ok(CommitReport {
                    transaction: self.id.clone(),
                    published,
                })
            }
            Err(err) => {
                *state = TransactionState::RolledBack;
                tracing::warn!(transaction = %self.id, error = %err, "commit aborted, rolled back");
                Err(err)
            }
        }
    }

    /// Discard the recorded events and end the transaction. Returns how
    /// many were discarded.
    pub fn rollback(&self) -> Result<usize, TransactionError> {
        let mut state = self.lock_active()?;
        let discarded = self.publisher.discard_on_rollback();
        *state = TransactionState::RolledBack;
        tracing::info!(transaction = %self.id, discarded, "transaction rolled back");
        Ok(discarded)
    }

    fn lock_active(&self) -> Result<std::sync::MutexGuard<'_, TransactionState>, TransactionError> {
        let state = self.state.lock().map_err(|_| TransactionError::Poisoned)?;
        if *state != TransactionState::Active {
            return Err(TransactionError::NotActive(self.id.clone()));
        }
        Ok(state)
    }
}

impl TransactionContext for Transaction {
    fn id(&self) -> &TransactionId {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.state() == TransactionState::Active
    }

    fn record(&self, event: LifecycleEvent) -> Result<u64, TransactionError> {
        let _state = self.lock_active()?;
        self.publisher.record(&self.id, event)
    }

    fn apply_and_record(
        &self,
        mutation: Box<dyn FnOnce() -> Result<LifecycleEvent, InteractionError> + '_>,
    ) -> Result<u64, InteractionError> {
        let _state = self.lock_active()?;
        let event = mutation()?;
        Ok(self.publisher.record(&self.id, event)?)
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        let state = match self.state.get_mut() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *state == TransactionState::Active {
            let discarded = self.publisher.discard_on_rollback();
            *state = TransactionState::RolledBack;
            tracing::warn!(transaction = %self.id, discarded, "transaction dropped while active, rolled back");
        }
    }
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("publisher", &self.publisher)
            .finish()
    }
}

/// Hands out transactions that publish to a shared set of listeners.
pub struct TransactionManager {
    listeners: Vec<Arc<dyn LifecycleListener>>,
    next_id: AtomicU64,
}

impl TransactionManager {
    /// A manager with no listeners.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Deliver committed events to `listener` too. Affects transactions
    /// begun afterwards.
    pub fn add_listener(&mut self, listener: Arc<dyn LifecycleListener>) {
        self.listeners.push(listener);
    }

    /// Builder form of [`TransactionManager::add_listener`].
    pub fn with_listener(mut self, listener: Arc<dyn LifecycleListener>) -> Self {
        self.add_listener(listener);
        self
    }

    /// Start a transaction named `tx-N`.
    pub fn begin(&self) -> Arc<Transaction> {
        let id = format!("tx-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(transaction = %id, "transaction started");
        Arc::new(Transaction::new(id, self.listeners.clone()))
    }

    /// Run `f` in a fresh transaction: commit if it returns `Ok`, roll
    /// back if it returns `Err`. The error from `f` is returned even if the
    /// rollback fails too.
    pub fn in_transaction<R, E>(
        &self,
        f: impl FnOnce(&Arc<Transaction>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<TransactionError>,
    {
        let tx = self.begin();
        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback() {
                    tracing::warn!(
                        transaction = %tx.id(),
                        error = %rollback,
                        "rollback after failed work also failed"
                    );
                }
                Err(err)
            }
        }
    }
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new()
    }
}
