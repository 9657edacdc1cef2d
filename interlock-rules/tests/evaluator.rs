use interlock_core::context::ExecutionContext;
use interlock_core::error::InteractionError;
use interlock_core::member::{MemberSpec, Where};
use interlock_core::rule::{Candidate, Consent, Rule, RuleContext, RulePhase};
use interlock_core::test_utils::{BOOK, Book, VetoRule, book_members};
use interlock_core::value::ValueType;
use interlock_rules::{RuleEvaluator, Subject};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn member(name: &str) -> MemberSpec {
    book_members()
        .into_iter()
        .find(|m| m.name == name)
        .expect("book member")
}

fn subject<'a>(
    member: &'a MemberSpec,
    rules: &'a [Arc<dyn Rule>],
    book: &'a Book,
    ctx: &'a ExecutionContext,
) -> Subject<'a> {
    Subject {
        member,
        member_rules: rules,
        target: book,
        place: Where::ObjectForms,
        context: ctx,
    }
}

// --- Visibility ---

#[test]
fn hidden_member_short_circuits_to_not_found() {
    let evaluator = RuleEvaluator::new();
    let usability = Arc::new(VetoRule::new(RulePhase::Usability, "never"));
    let rules: Vec<Arc<dyn Rule>> = vec![usability.clone() as Arc<dyn Rule>];
    let spec = member("internalCode");
    let book = Book::sample();
    let ctx = ExecutionContext::new("alice");

    let evaluation = evaluator.evaluate(&subject(&spec, &rules, &book, &ctx), None);
    assert!(!evaluation.is_visible());
    assert_eq!(evaluation.usable, None);
    // usability rules are never consulted for hidden members
    assert_eq!(usability.checks(), 0);

    let err = evaluator
        .check(&subject(&spec, &rules, &book, &ctx), Some(&Candidate::Value(json!("X"))))
        .unwrap_err();
    assert_eq!(err, InteractionError::not_found("Book#internalCode"));
}

#[test]
fn hidden_where_depends_on_place() {
    let evaluator = RuleEvaluator::new();
    let spec = MemberSpec::property(BOOK, "author", ValueType::String).hidden_in(Where::AllTables);
    let book = Book::sample();
    let ctx = ExecutionContext::new("alice");
    let mut subj = subject(&spec, &[], &book, &ctx);

    assert!(evaluator.check_visible(&subj).is_ok());
    subj.place = Where::StandaloneTables;
    assert!(matches!(
        evaluator.check_visible(&subj),
        Err(InteractionError::NotFound { .. })
    ));
}

// --- Usability ---

#[test]
fn disabled_facet_reports_reason() {
    let evaluator = RuleEvaluator::new();
    let spec = member("reviewedBy");
    let book = Book::sample();
    let ctx = ExecutionContext::new("alice");

    let err = evaluator
        .check(&subject(&spec, &[], &book, &ctx), None)
        .unwrap_err();
    assert_eq!(
        err,
        InteractionError::Disabled {
            member: "Book#reviewedBy".into(),
            reason: "Set by the stampReviewer action".into(),
        }
    );
}

#[test]
fn visible_but_disabled_member_is_still_visible() {
    let evaluator = RuleEvaluator::new();
    let spec = member("reviewedBy");
    let book = Book::sample();
    let ctx = ExecutionContext::new("alice");
    let subj = subject(&spec, &[], &book, &ctx);

    assert!(evaluator.check_visible(&subj).is_ok());
    let evaluation = evaluator.evaluate(&subj, None);
    assert!(evaluation.is_visible());
    assert!(!evaluation.is_usable());
}

// --- Validity ---

#[test]
fn mandatory_property_rejects_null() {
    let evaluator = RuleEvaluator::new();
    let spec = member("name");
    let book = Book::sample();
    let ctx = ExecutionContext::new("alice");
    let candidate = Candidate::Value(json!(null));

    match evaluator.check(&subject(&spec, &[], &book, &ctx), Some(&candidate)) {
        Err(InteractionError::Invalid {
            candidate, reason, ..
        }) => {
            assert_eq!(candidate, json!(null));
            assert_eq!(reason, "'name' is mandatory");
        }
        other => panic!("expected Invalid, got {other:?}"),
    }
}

#[test]
fn optional_property_accepts_null() {
    let evaluator = RuleEvaluator::new();
    let spec = member("description");
    let book = Book::sample();
    let ctx = ExecutionContext::new("alice");
    let consent = evaluator.validate(&subject(&spec, &[], &book, &ctx), &Candidate::Value(json!(null)));
    assert!(consent.is_allowed());
}

#[test]
fn action_arity_and_types_are_checked() {
    let evaluator = RuleEvaluator::new();
    let spec = member("applyDiscount");
    let book = Book::sample();
    let ctx = ExecutionContext::new("alice");
    let subj = subject(&spec, &[], &book, &ctx);

    let none = evaluator.validate(&subj, &Candidate::Arguments(vec![]));
    assert_eq!(none.reason(), Some("expected 1 argument(s), got 0"));

    let wrong = evaluator.validate(&subj, &Candidate::Arguments(vec![json!("ten")]));
    assert_eq!(wrong.reason(), Some("'percent' expects number"));

    let ok = evaluator.validate(&subj, &Candidate::Arguments(vec![json!(10)]));
    assert!(ok.is_allowed());
}

#[test]
fn invalid_candidate_carries_argument_array() {
    let evaluator = RuleEvaluator::new();
    let spec = member("applyDiscount");
    let book = Book::sample();
    let ctx = ExecutionContext::new("alice");
    let candidate = Candidate::Arguments(vec![json!(true)]);

    let err = evaluator
        .check(&subject(&spec, &[], &book, &ctx), Some(&candidate))
        .unwrap_err();
    assert!(matches!(err, InteractionError::Invalid { candidate, .. } if candidate == json!([true])));
}

// --- Pipeline order ---

struct NamedRule {
    name: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
    veto: bool,
}

impl Rule for NamedRule {
    fn phases(&self) -> &[RulePhase] {
        &[RulePhase::Usability]
    }

    fn check(&self, _ctx: &RuleContext<'_>) -> Consent {
        self.log.lock().unwrap().push(self.name);
        if self.veto {
            Consent::veto(self.name)
        } else {
            Consent::Allow
        }
    }
}

#[test]
fn member_rules_run_before_registered_rules_and_first_veto_wins() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let evaluator = RuleEvaluator::new()
        .with_rule(Arc::new(NamedRule {
            name: "registered",
            log: Arc::clone(&log),
            veto: true,
        }))
        .with_rule(Arc::new(NamedRule {
            name: "never-reached",
            log: Arc::clone(&log),
            veto: false,
        }));
    let member_rule: Arc<dyn Rule> = Arc::new(NamedRule {
        name: "member",
        log: Arc::clone(&log),
        veto: false,
    });
    let member_rules = vec![member_rule];
    let spec = member("price");
    let book = Book::sample();
    let ctx = ExecutionContext::new("alice");

    let evaluation = evaluator.evaluate(&subject(&spec, &member_rules, &book, &ctx), None);
    assert_eq!(evaluation.usable, Some(Consent::veto("registered")));
    assert_eq!(*log.lock().unwrap(), vec!["member", "registered"]);
}

#[test]
fn evaluation_is_repeatable() {
    let evaluator = RuleEvaluator::new().with_rule(Arc::new(
        VetoRule::new(RulePhase::Usability, "read only").for_member("author"),
    ));
    let spec = member("author");
    let book = Book::sample();
    let ctx = ExecutionContext::new("alice");
    let subj = subject(&spec, &[], &book, &ctx);

    let first = evaluator.evaluate(&subj, None);
    let second = evaluator.evaluate(&subj, None);
    assert_eq!(first, second);
    assert!(!first.is_usable());
}

#[test]
fn without_builtins_ignores_facets() {
    let evaluator = RuleEvaluator::without_builtins();
    assert!(evaluator.is_empty());
    let spec = member("internalCode");
    let book = Book::sample();
    let ctx = ExecutionContext::new("alice");
    assert!(evaluator.check(&subject(&spec, &[], &book, &ctx), None).is_ok());
}

#[test]
fn role_based_rule_sees_execution_context() {
    struct EditorsOnly;
    impl Rule for EditorsOnly {
        fn phases(&self) -> &[RulePhase] {
            &[RulePhase::Usability]
        }
        fn check(&self, ctx: &RuleContext<'_>) -> Consent {
            if ctx.context.has_role("editor") {
                Consent::Allow
            } else {
                Consent::veto("Editors only")
            }
        }
    }

    let evaluator = RuleEvaluator::new().with_rule(Arc::new(EditorsOnly));
    let spec = member("price");
    let book = Book::sample();
    let guest = ExecutionContext::new("guest");
    let editor = ExecutionContext::new("ed").with_role("editor");

    assert!(evaluator.check(&subject(&spec, &[], &book, &guest), None).is_err());
    assert!(evaluator.check(&subject(&spec, &[], &book, &editor), None).is_ok());
}
