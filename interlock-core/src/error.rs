//! Error types for each protocol.
//!
//! Every error here is `Clone`: an async outcome is stored in a one-shot
//! channel and handed back to whichever caller retrieves it.

use crate::duration::DurationMs;
use crate::id::TransactionId;
use crate::value::Value;
use thiserror::Error;

/// Why a mediated interaction did not happen.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InteractionError {
    /// The member does not exist, or is hidden. Both look the same to the
    /// caller so hidden members cannot be probed for.
    #[error("no such member: {member}")]
    NotFound {
        /// `Owner#name` of the requested member.
        member: String,
    },

    /// The member is visible but may not be used right now.
    #[error("{member} is disabled: {reason}")]
    Disabled {
        /// `Owner#name` of the member.
        member: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The proposed value or arguments were rejected.
    #[error("invalid candidate for {member}: {reason}")]
    Invalid {
        /// `Owner#name` of the member.
        member: String,
        /// The rejected value, or the argument list as an array.
        candidate: Value,
        /// Human-readable reason.
        reason: String,
    },

    /// The interaction protocol was misused: double submit, overlapping
    /// negotiations, no active transaction, result already taken.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// An async result was not ready within the requested wait.
    #[error("timed out after {0}")]
    Timeout(DurationMs),

    /// A background task ended without producing a result.
    #[error("async task failed: {0}")]
    TaskFailed(String),

    /// The domain object itself failed the operation.
    #[error("domain error: {0}")]
    Domain(#[from] ObjectError),

    /// The transaction refused the recorded event.
    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),
}

impl InteractionError {
    /// Build a [`InteractionError::NotFound`].
    pub fn not_found(member: impl Into<String>) -> Self {
        Self::NotFound {
            member: member.into(),
        }
    }

    /// Build a [`InteractionError::IllegalState`].
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }

    /// Whether this is a rule violation (not found, disabled or invalid).
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Disabled { .. } | Self::Invalid { .. }
        )
    }
}

/// Errors raised by a domain object's own get/set/invoke.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    /// The object has no such property.
    #[error("no such property: {0}")]
    NoSuchProperty(String),

    /// The object has no such action.
    #[error("no such action: {0}")]
    NoSuchAction(String),

    /// A value could not be converted to the field's type.
    #[error("type mismatch for {member}: expected {expected}")]
    TypeMismatch {
        /// Member name.
        member: String,
        /// What the object expected.
        expected: String,
    },

    /// A lock around the object was poisoned by a panic.
    #[error("object lock poisoned")]
    Poisoned,

    /// Catch-all. Include context.
    #[error("{0}")]
    Failed(String),
}

/// Transaction errors.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// The transaction already committed or rolled back.
    #[error("transaction {0} is not active")]
    NotActive(TransactionId),

    /// A listener refused the batch; nothing was published and the
    /// transaction rolled back.
    #[error("flush of transaction {transaction} aborted: {reason}")]
    FlushAborted {
        /// The transaction whose flush failed.
        transaction: TransactionId,
        /// Why the listener refused.
        reason: String,
    },

    /// A lock around transaction state was poisoned by a panic.
    #[error("transaction state poisoned")]
    Poisoned,
}

/// Raised by a listener that cannot accept a commit batch.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListenerError {
    /// The listener refused the batch.
    #[error("listener rejected batch: {0}")]
    Rejected(String),
}

/// Metamodel registration errors.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetamodelError {
    /// A member with the same name is already registered on the type.
    #[error("duplicate member: {0}")]
    DuplicateMember(String),

    /// No member with that name is registered on the type.
    #[error("unknown member: {0}")]
    UnknownMember(String),

    /// A spec was registered under a type other than its owner.
    #[error("member {member} does not belong to {object_type}")]
    ForeignMember {
        /// `Owner#name` of the member.
        member: String,
        /// The type it was registered under.
        object_type: String,
    },
}
