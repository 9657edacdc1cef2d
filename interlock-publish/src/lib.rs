#![deny(missing_docs)]
//! Transactions and commit-bound publication of lifecycle events.
//!
//! A [`Transaction`] owns a [`CommitBoundPublisher`]. Interactions record
//! events into the transaction through
//! [`TransactionContext::record`](interlock_core::TransactionContext::record);
//! nothing reaches a [`LifecycleListener`](interlock_core::LifecycleListener)
//! until [`Transaction::commit`], and [`Transaction::rollback`] drops the
//! lot. Publication is all or nothing: listeners see the whole batch in
//! `prepare` before any single event is published.
//!
//! [`TransactionManager`] hands out transactions sharing one set of
//! listeners, and runs closures inside one with
//! [`TransactionManager::in_transaction`].

mod publisher;
mod transaction;

pub use publisher::CommitBoundPublisher;
pub use transaction::{CommitReport, Transaction, TransactionManager, TransactionState};
