//! Protocol-level tests for the interlock-core crate.
//! Run with: cargo test --features test-utils --test protocol

#![cfg(feature = "test-utils")]

use interlock_core::test_utils::{
    BOOK, Book, RecordingListener, RecordingTransaction, book_members, locked_book_members,
};
use interlock_core::*;
use serde_json::json;
use std::sync::Arc;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Object safety: Arc<dyn Trait> is Send + Sync
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn _assert_send_sync<T: Send + Sync>() {}

#[test]
fn protocol_objects_are_send_sync() {
    _assert_send_sync::<Arc<dyn Metamodel>>();
    _assert_send_sync::<Arc<dyn Rule>>();
    _assert_send_sync::<Arc<dyn TransactionContext>>();
    _assert_send_sync::<Arc<dyn LifecycleListener>>();
    _assert_send_sync::<ObjectHandle>();
    _assert_send_sync::<ExecutionContext>();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ObjectHandle
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn handle_shares_the_callers_instance() {
    let book = Book::sample().shared();
    let handle = ObjectHandle::from_shared(&book).unwrap();

    handle
        .write(|obj| obj.set("name", json!("Book #2")))
        .unwrap()
        .unwrap();

    assert_eq!(book.lock().unwrap().name, "Book #2");
    assert_eq!(handle.bookmark().to_string(), "Book:1");
    assert_eq!(handle.object_type().as_str(), BOOK);
}

#[test]
fn cloned_handles_point_at_one_instance() {
    let handle = ObjectHandle::new(Book::sample());
    let other = handle.clone();
    assert!(handle.same_instance(&other));
    assert!(!handle.same_instance(&ObjectHandle::new(Book::sample())));
}

#[test]
fn book_rejects_wrongly_typed_values() {
    let mut book = Book::sample();
    let err = book.set("name", json!(42)).unwrap_err();
    assert!(matches!(err, ObjectError::TypeMismatch { .. }));
    assert_eq!(book.name, "Sample Book");
}

#[test]
fn book_actions_change_price() {
    let mut book = Book::sample();
    assert_eq!(book.invoke("doubleThePrice", &[]).unwrap(), json!(198.0));
    assert_eq!(book.invoke("applyDiscount", &[json!(50)]).unwrap(), json!(99.0));
    assert!(matches!(
        book.invoke("burn", &[]),
        Err(ObjectError::NoSuchAction(_))
    ));
}

#[test]
fn stamp_reviewer_reads_current_context() {
    let mut book = Book::sample();
    let result = ExecutionContext::new("carol").scope_sync(|| book.invoke("stampReviewer", &[]));
    assert_eq!(result.unwrap(), json!("carol"));
    assert_eq!(book.reviewed_by.as_deref(), Some("carol"));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Catalogue
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn locked_catalogue_disables_name_and_double() {
    let locked = locked_book_members();
    let disabled: Vec<_> = locked
        .iter()
        .filter(|m| m.disabled_reason.is_some())
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(disabled, vec!["name", "reviewedBy", "doubleThePrice"]);
    assert_eq!(locked.len(), book_members().len());
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Events and transactions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn property_changed_serializes_with_type_tag() {
    let event = LifecycleEvent::new(
        EventKind::PropertyChanged {
            property: "name".into(),
            before: json!("Sample Book"),
            after: json!("Book #2"),
        },
        Bookmark::new(BOOK, "1"),
        UserId::new("alice"),
    );
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["kind"]["type"], "property_changed");
    assert_eq!(json["target"]["object_type"], "Book");
    assert_eq!(json["sequence"], 0);
}

#[test]
fn recording_transaction_stamps_sequence() {
    let tx = RecordingTransaction::new("tx-test");
    let event = LifecycleEvent::new(EventKind::Created, Bookmark::new(BOOK, "1"), UserId::new("a"));
    assert_eq!(tx.record(event.clone()).unwrap(), 1);
    assert_eq!(tx.record(event.clone()).unwrap(), 2);

    tx.close();
    assert!(matches!(
        tx.record(event),
        Err(TransactionError::NotActive(_))
    ));
    let recorded = tx.events();
    assert_eq!(recorded[1].sequence, 2);
    assert_eq!(recorded[0].transaction, Some(TransactionId::new("tx-test")));
}

#[test]
fn rejecting_listener_refuses_batches() {
    let listener = RecordingListener::rejecting("downstream unavailable");
    assert!(listener.prepare(&[]).is_err());
    assert_eq!(listener.prepared_batches(), vec![0]);
}

#[test]
fn execution_context_debug_shows_transaction_id() {
    let tx: Arc<dyn TransactionContext> = Arc::new(RecordingTransaction::new("tx-9"));
    let ctx = ExecutionContext::new("dave").with_transaction(tx);
    let rendered = format!("{ctx:?}");
    assert!(rendered.contains("tx-9"));
    assert!(rendered.contains("dave"));
}

#[test]
fn rule_violations_are_classified() {
    assert!(InteractionError::not_found("Book#x").is_rule_violation());
    assert!(!InteractionError::illegal_state("twice").is_rule_violation());
    assert!(!InteractionError::Timeout(DurationMs::from_millis(5)).is_rule_violation());
}
