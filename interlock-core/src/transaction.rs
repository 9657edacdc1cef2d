//! The Transaction protocol: where recorded events go.

use crate::error::{InteractionError, TransactionError};
use crate::id::TransactionId;
use crate::lifecycle::LifecycleEvent;

/// Protocol ④ — Transaction
///
/// The interaction layer's only view of a transaction: an id, whether it
/// still accepts work, and a sink for events. Committing and rolling back
/// belong to whoever opened the transaction, not to the code recording
/// into it.
///
/// `record` is called from the caller's thread for sync interactions and
/// from background tasks for async ones, possibly concurrently; appends
/// must be serialized by the implementation.
pub trait TransactionContext: Send + Sync {
    /// The transaction's id.
    fn id(&self) -> &TransactionId;

    /// Whether events may still be recorded.
    fn is_active(&self) -> bool;

    /// Append one event. Returns its sequence number within the transaction.
    fn record(&self, event: LifecycleEvent) -> Result<u64, TransactionError>;

    /// Run `mutation` and record the event it returns.
    ///
    /// Implementations that can end concurrently should override this so
    /// the transaction cannot commit or roll back between the mutation and
    /// its recording. The default only checks [`is_active`] first; if
    /// `record` then fails the mutation has already happened, and undoing
    /// it is up to the caller.
    ///
    /// [`is_active`]: TransactionContext::is_active
    fn apply_and_record(
        &self,
        mutation: Box<dyn FnOnce() -> Result<LifecycleEvent, InteractionError> + '_>,
    ) -> Result<u64, InteractionError> {
        if !self.is_active() {
            return Err(TransactionError::NotActive(self.id().clone()).into());
        }
        let event = mutation()?;
        Ok(self.record(event)?)
    }
}
