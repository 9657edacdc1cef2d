//! In-memory fixtures for testing.
//!
//! Available behind the `test-utils` feature flag. A small `Book` domain
//! with its member catalogue, plus recording implementations of the
//! listener and transaction protocols and a configurable veto rule.

mod book;
mod recording_listener;
mod recording_transaction;
mod veto_rule;

pub use book::{Book, book_members, locked_book_members, BOOK};
pub use recording_listener::RecordingListener;
pub use recording_transaction::RecordingTransaction;
pub use veto_rule::VetoRule;
