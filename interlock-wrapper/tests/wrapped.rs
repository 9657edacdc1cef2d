use interlock_core::context::ExecutionContext;
use interlock_core::control::SyncControl;
use interlock_core::error::{InteractionError, ObjectError};
use interlock_core::lifecycle::EventKind;
use interlock_core::member::MemberSpec;
use interlock_core::object::Shared;
use interlock_core::test_utils::{BOOK, Book, RecordingListener, book_members, locked_book_members};
use interlock_interaction::InteractionService;
use interlock_metamodel::MetamodelRegistry;
use interlock_publish::{Transaction, TransactionManager};
use interlock_wrapper::{MemberCall, Wrapped, WrapperFactory};
use serde_json::json;
use std::sync::Arc;

fn factory(members: Vec<MemberSpec>) -> WrapperFactory {
    let mut registry = MetamodelRegistry::new();
    registry.register_type(BOOK, members).unwrap();
    WrapperFactory::new(InteractionService::with_default_rules(Arc::new(registry)))
}

struct Publishing {
    listener: Arc<RecordingListener>,
    tx: Arc<Transaction>,
    ctx: ExecutionContext,
}

fn publishing() -> Publishing {
    let listener = Arc::new(RecordingListener::new());
    let tx = TransactionManager::new()
        .with_listener(listener.clone())
        .begin();
    let ctx = tx.bind(ExecutionContext::new("alice"));
    Publishing { listener, tx, ctx }
}

fn name_of(book: &Shared<Book>) -> String {
    book.lock().unwrap().name.clone()
}

// ━━━ Rule enforcement ━━━

#[test]
fn disabled_property_fails_and_target_is_unchanged() {
    let p = publishing();
    let book = Book::sample().shared();
    let wrapped = factory(locked_book_members())
        .wrap(&book, SyncControl::defaults(), p.ctx.clone())
        .unwrap();

    let err = wrapped.set("name", "Book #2").unwrap_err();
    assert_eq!(
        err,
        InteractionError::Disabled {
            member: "Book#name".into(),
            reason: "Locked for publishing".into(),
        }
    );
    assert_eq!(name_of(&book), "Sample Book");

    p.tx.commit().unwrap();
    assert!(p.listener.events().is_empty());
}

#[test]
fn skip_rules_sets_value_and_publishes_one_event() {
    let p = publishing();
    let book = Book::sample().shared();
    let wrapped = factory(locked_book_members())
        .wrap(&book, SyncControl::defaults().with_skip_rules(), p.ctx.clone())
        .unwrap();

    wrapped.set("name", "Book #2").unwrap();
    assert_eq!(name_of(&book), "Book #2");

    p.tx.commit().unwrap();
    let events = p.listener.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0].kind,
        EventKind::PropertyChanged { property, after, .. } if property == "name" && *after == json!("Book #2")
    ));
}

#[test]
fn hidden_member_is_not_found_on_every_call() {
    let p = publishing();
    let book = Book::sample().shared();
    let wrapped = factory(book_members())
        .wrap(&book, SyncControl::defaults(), p.ctx.clone())
        .unwrap();

    for result in [
        wrapped.get("internalCode"),
        wrapped.call(MemberCall::set("internalCode", "X")),
    ] {
        assert_eq!(result, Err(InteractionError::not_found("Book#internalCode")));
    }
    assert_eq!(book.lock().unwrap().internal_code, "INT-001");
}

#[test]
fn invalid_arguments_are_refused() {
    let p = publishing();
    let book = Book::sample().shared();
    let wrapped = factory(book_members())
        .wrap(&book, SyncControl::defaults(), p.ctx.clone())
        .unwrap();

    let err = wrapped.invoke("applyDiscount", vec![json!("lots")]).unwrap_err();
    assert!(matches!(err, InteractionError::Invalid { ref candidate, .. } if *candidate == json!(["lots"])));
    assert_eq!(book.lock().unwrap().price, 99.0);
    assert!(p.tx.pending().is_empty());
}

#[test]
fn reading_through_the_wrapper_records_nothing() {
    let p = publishing();
    let book = Book::sample().shared();
    let wrapped = factory(book_members())
        .wrap(&book, SyncControl::defaults(), p.ctx.clone())
        .unwrap();
    assert_eq!(wrapped.get("price").unwrap(), json!(99.0));
    assert!(p.tx.pending().is_empty());
}

#[test]
fn each_successful_call_records_exactly_one_event() {
    let p = publishing();
    let book = Book::sample().shared();
    let wrapped = factory(book_members())
        .wrap(&book, SyncControl::defaults(), p.ctx.clone())
        .unwrap();

    wrapped.set("author", "Someone").unwrap();
    assert!(wrapped.set("reviewedBy", "mallory").is_err());
    wrapped.invoke("doubleThePrice", vec![]).unwrap();
    assert!(wrapped.invoke("doubleThePrice", vec![json!(1)]).is_err());
    wrapped.invoke("stampReviewer", vec![]).unwrap();

    assert_eq!(p.tx.commit().unwrap().published, 3);
    let labels: Vec<_> = p.listener.events().iter().map(|e| e.kind.label()).collect();
    assert_eq!(labels, vec!["property_changed", "action_invoked", "action_invoked"]);
    assert_eq!(book.lock().unwrap().reviewed_by.as_deref(), Some("alice"));
}

#[test]
fn wrapper_without_transaction_refuses_mutation() {
    let book = Book::sample().shared();
    let wrapped = factory(book_members())
        .wrap(&book, SyncControl::defaults(), ExecutionContext::new("alice"))
        .unwrap();
    assert!(wrapped.get("name").is_ok());
    assert!(matches!(
        wrapped.set("name", "Book #2"),
        Err(InteractionError::IllegalState(_))
    ));
}

// ━━━ Capability traits ━━━

trait BookApi {
    fn name(&self) -> Result<String, InteractionError>;
    fn rename(&self, name: &str) -> Result<(), InteractionError>;
    fn double_the_price(&self) -> Result<f64, InteractionError>;
}

impl BookApi for Wrapped<Book> {
    fn name(&self) -> Result<String, InteractionError> {
        self.get("name")?
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| {
                ObjectError::TypeMismatch {
                    member: "name".into(),
                    expected: "string".into(),
                }
                .into()
            })
    }

    fn rename(&self, name: &str) -> Result<(), InteractionError> {
        self.set("name", name)
    }

    fn double_the_price(&self) -> Result<f64, InteractionError> {
        let price = self.invoke("doubleThePrice", vec![])?;
        price
            .as_f64()
            .ok_or_else(|| ObjectError::Failed(format!("not a price: {price}")).into())
    }
}

#[test]
fn capability_trait_reads_like_the_domain_type() {
    let p = publishing();
    let book = Book::sample().shared();
    let wrapped = factory(book_members())
        .wrap(&book, SyncControl::defaults(), p.ctx.clone())
        .unwrap();

    assert_eq!(wrapped.name().unwrap(), "Sample Book");
    wrapped.rename("Book #2").unwrap();
    assert_eq!(wrapped.name().unwrap(), "Book #2");
    assert_eq!(wrapped.double_the_price().unwrap(), 198.0);
}

#[test]
fn capability_trait_surfaces_rule_failures() {
    let p = publishing();
    let book = Book::sample().shared();
    let wrapped = factory(locked_book_members())
        .wrap(&book, SyncControl::defaults(), p.ctx.clone())
        .unwrap();

    assert!(matches!(
        wrapped.double_the_price(),
        Err(InteractionError::Disabled { .. })
    ));
    assert_eq!(book.lock().unwrap().price, 99.0);
}
