//! # interlock-core — Protocol types for rule-mediated interaction
//!
//! This crate defines the vocabulary shared by every interlock crate: how a
//! domain object is addressed, how its members are described, how rules
//! decide whether a member may be seen, used or given a value, and how the
//! resulting state transitions are reported to a transaction.
//!
//! ## The Protocols
//!
//! | Protocol | Trait | What it does |
//! |----------|-------|-------------|
//! | ① Object | [`DomainObject`] | Name-based get/set/invoke on one instance |
//! | ② Metamodel | [`Metamodel`] | Resolves `(type, member)` to a [`MemberSpec`] |
//! | ③ Rules | [`Rule`] | Vetoes visibility, usability or validity |
//! | ④ Transaction | [`TransactionContext`] | Accepts recorded [`LifecycleEvent`]s |
//! | ⑤ Listener | [`LifecycleListener`] | Receives events once a transaction commits |
//!
//! ## Execution control
//!
//! [`SyncControl`] and [`AsyncControl`] carry the [`Enforcement`] mode of a
//! call. [`ExecutionContext`] carries the acting user and the transaction a
//! call records into; it is propagated into background tasks as a
//! task-local and readable from domain code through
//! [`ExecutionContext::current`].
//!
//! Everything here is synchronous. Only the async wrapper in
//! `interlock-wrapper` crosses a scheduling boundary.

#![deny(missing_docs)]

pub mod context;
pub mod control;
pub mod duration;
pub mod error;
pub mod id;
pub mod lifecycle;
pub mod member;
pub mod metamodel;
pub mod object;
pub mod rule;
pub mod transaction;
pub mod value;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-exports for convenience
pub use context::ExecutionContext;
pub use control::{AsyncControl, ControlConfig, Enforcement, SyncControl};
pub use duration::DurationMs;
pub use error::{
    InteractionError, ListenerError, MetamodelError, ObjectError, TransactionError,
};
pub use id::{ObjectId, TransactionId, TypeName, UserId};
pub use lifecycle::{EventKind, LifecycleEvent, LifecycleListener};
pub use member::{MemberKind, MemberSpec, ParamSpec, Where};
pub use metamodel::Metamodel;
pub use object::{Bookmark, DomainObject, ObjectHandle, Shared};
pub use rule::{Candidate, Consent, Rule, RuleContext, RulePhase};
pub use transaction::TransactionContext;
pub use value::{Value, ValueType};
