use interlock_core::error::MetamodelError;
use interlock_core::id::TypeName;
use interlock_core::member::{MemberKind, MemberSpec};
use interlock_core::metamodel::Metamodel;
use interlock_core::rule::RulePhase;
use interlock_core::test_utils::{BOOK, VetoRule, book_members};
use interlock_core::value::ValueType;
use interlock_metamodel::MetamodelRegistry;
use std::sync::Arc;

fn book_registry() -> MetamodelRegistry {
    let mut registry = MetamodelRegistry::new();
    registry.register_type(BOOK, book_members()).unwrap();
    registry
}

// --- Resolution ---

#[test]
fn resolves_registered_members() {
    let registry = book_registry();
    let spec = registry
        .resolve_member(&TypeName::new(BOOK), "name")
        .expect("name is registered");
    assert_eq!(spec.kind, MemberKind::Property);
    assert_eq!(spec.element_type, ValueType::String);
}

#[test]
fn unknown_member_resolves_to_none() {
    let registry = book_registry();
    assert!(registry.resolve_member(&TypeName::new(BOOK), "isbn").is_none());
    assert!(registry.resolve_member(&TypeName::new("Author"), "name").is_none());
}

#[test]
fn resolution_shares_one_spec() {
    let registry = book_registry();
    let ty = TypeName::new(BOOK);
    let a = registry.resolve_member(&ty, "price").unwrap();
    let b = registry.resolve_member(&ty, "price").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

// --- Registration ---

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = book_registry();
    let err = registry
        .register(MemberSpec::property(BOOK, "name", ValueType::String))
        .unwrap_err();
    assert_eq!(err, MetamodelError::DuplicateMember("Book#name".into()));
}

#[test]
fn foreign_member_is_rejected() {
    let mut registry = MetamodelRegistry::new();
    let err = registry
        .register_type("Author", vec![MemberSpec::property(BOOK, "name", ValueType::String)])
        .unwrap_err();
    assert!(matches!(err, MetamodelError::ForeignMember { .. }));
    assert!(registry.is_empty());
}

#[test]
fn members_of_lists_one_type() {
    let mut registry = book_registry();
    registry
        .register(MemberSpec::property("Author", "name", ValueType::String))
        .unwrap();
    assert_eq!(registry.members_of(&TypeName::new(BOOK)).len(), book_members().len());
    assert_eq!(registry.len(), book_members().len() + 1);
}

// --- Rules ---

#[test]
fn attached_rules_are_returned_per_member() {
    let mut registry = book_registry();
    registry
        .attach_rule(BOOK, "price", Arc::new(VetoRule::new(RulePhase::Usability, "frozen")))
        .unwrap();

    let ty = TypeName::new(BOOK);
    let price = registry.resolve_member(&ty, "price").unwrap();
    let name = registry.resolve_member(&ty, "name").unwrap();
    assert_eq!(registry.rules(&price).len(), 1);
    assert!(registry.rules(&name).is_empty());
}

#[test]
fn attaching_to_unknown_member_fails() {
    let mut registry = book_registry();
    let err = registry
        .attach_rule(BOOK, "isbn", Arc::new(VetoRule::new(RulePhase::Visibility, "x")))
        .unwrap_err();
    assert_eq!(err, MetamodelError::UnknownMember("Book#isbn".into()));
}
