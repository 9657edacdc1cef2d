use crate::apply;
use interlock_core::context::ExecutionContext;
use interlock_core::error::InteractionError;
use interlock_core::lifecycle::EventKind;
use interlock_core::object::ObjectHandle;

/// Records the lifecycle events that are not member interactions.
///
/// The persistence layer calls these as objects come and go; each records
/// one event into the context's transaction and, like member mutations,
/// needs that transaction to be active.
#[derive(Debug, Clone)]
pub struct ObjectLifecycle {
    context: ExecutionContext,
}

impl ObjectLifecycle {
    /// Record on behalf of `context`.
    pub fn new(context: ExecutionContext) -> Self {
        Self { context }
    }

    /// `target` was just instantiated.
    pub fn created(&self, target: &ObjectHandle) -> Result<u64, InteractionError> {
        self.record(EventKind::Created, target)
    }

    /// `target` was just read from its store.
    pub fn loaded(&self, target: &ObjectHandle) -> Result<u64, InteractionError> {
        self.record(EventKind::Loaded, target)
    }

    /// `target` was just written to its store for the first time.
    pub fn persisted(&self, target: &ObjectHandle) -> Result<u64, InteractionError> {
        self.record(EventKind::Persisted, target)
    }

    /// `target` was just deleted from its store.
    pub fn removed(&self, target: &ObjectHandle) -> Result<u64, InteractionError> {
        self.record(EventKind::Removed, target)
    }

    fn record(&self, kind: EventKind, target: &ObjectHandle) -> Result<u64, InteractionError> {
        apply::record(&self.context, kind, target.bookmark().clone())
    }
}
