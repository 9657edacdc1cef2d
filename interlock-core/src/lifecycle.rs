//! Lifecycle events and the listeners that receive them at commit.

use crate::error::ListenerError;
use crate::id::{TransactionId, UserId};
use crate::object::Bookmark;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// What happened to a domain instance.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A new instance was instantiated.
    Created,
    /// An existing instance was loaded.
    Loaded,
    /// An instance was handed to persistence.
    Persisted,
    /// A property changed.
    PropertyChanged {
        /// Property name.
        property: String,
        /// Value before the change.
        before: Value,
        /// Value after the change, as read back from the object.
        after: Value,
    },
    /// An action ran.
    ActionInvoked {
        /// Action name.
        action: String,
        /// Arguments it was invoked with.
        arguments: Vec<Value>,
        /// What it returned.
        result: Value,
    },
    /// An instance was removed.
    Removed,
}

impl EventKind {
    /// Short snake_case label, used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Loaded => "loaded",
            EventKind::Persisted => "persisted",
            EventKind::PropertyChanged { .. } => "property_changed",
            EventKind::ActionInvoked { .. } => "action_invoked",
            EventKind::Removed => "removed",
        }
    }
}

/// A state transition waiting for its transaction to commit.
///
/// The transaction stamps `transaction` and `sequence` when the event is
/// recorded; events built by hand start with `None` and `0`.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// What happened.
    pub kind: EventKind,
    /// To which instance.
    pub target: Bookmark,
    /// On whose behalf.
    pub user: UserId,
    /// The recording transaction.
    pub transaction: Option<TransactionId>,
    /// Position within the transaction, starting at 1.
    pub sequence: u64,
}

impl LifecycleEvent {
    /// Create an unrecorded event.
    pub fn new(kind: EventKind, target: Bookmark, user: UserId) -> Self {
        Self {
            kind,
            target,
            user,
            transaction: None,
            sequence: 0,
        }
    }
}

/// Protocol ⑤ — Listener
///
/// Downstream consumer of committed events. Publication is two-phase so a
/// commit never publishes half a batch: every listener is first asked to
/// [`prepare`](LifecycleListener::prepare) the whole batch, and only if all
/// of them accept does any listener see [`publish`](LifecycleListener::publish).
pub trait LifecycleListener: Send + Sync {
    /// Accept or refuse the batch about to be published. Defaults to accept.
    fn prepare(&self, _batch: &[LifecycleEvent]) -> Result<(), ListenerError> {
        Ok(())
    }

    /// Receive one committed event. Called once per event, in recording order.
    fn publish(&self, event: &LifecycleEvent);
}
