#![deny(missing_docs)]
//! Rule evaluation for interlock.
//!
//! The [`RuleEvaluator`] answers three questions about a member of a
//! target object, in order: is it visible, is it usable, and is a given
//! candidate valid. Each question is answered by an ordered pipeline of
//! [`Rule`]s: the built-in facet rules, then the rules the metamodel
//! attached to the member, then rules registered on the evaluator. The
//! first veto in a phase wins and later rules are not consulted.
//!
//! A hidden member short-circuits everything after it and is reported as
//! [`InteractionError::NotFound`], the same error an unknown member gets.

mod builtin;
mod evaluation;

pub use builtin::{DisabledFacetRule, ElementTypeRule, HiddenWhereRule};
pub use evaluation::Evaluation;

use interlock_core::context::ExecutionContext;
use interlock_core::error::InteractionError;
use interlock_core::member::{MemberSpec, Where};
use interlock_core::object::DomainObject;
use interlock_core::rule::{Candidate, Consent, Rule, RuleContext, RulePhase};
use std::sync::Arc;

/// What is being evaluated: one member of one instance, at one place, for
/// one caller.
pub struct Subject<'a> {
    /// The member.
    pub member: &'a MemberSpec,
    /// Rules the metamodel attached to the member.
    pub member_rules: &'a [Arc<dyn Rule>],
    /// The instance.
    pub target: &'a dyn DomainObject,
    /// Where the interaction happens.
    pub place: Where,
    /// Who is acting.
    pub context: &'a ExecutionContext,
}

/// An ordered rule pipeline.
///
/// Evaluation has no side effects beyond logging vetoes, and caches
/// nothing: asking twice with the same inputs gives the same answer.
pub struct RuleEvaluator {
    builtin: Vec<Arc<dyn Rule>>,
    registered: Vec<Arc<dyn Rule>>,
}

impl RuleEvaluator {
    /// An evaluator with the built-in facet rules and nothing else.
    pub fn new() -> Self {
        Self {
            builtin: vec![
                Arc::new(HiddenWhereRule),
                Arc::new(DisabledFacetRule),
                Arc::new(ElementTypeRule),
            ],
            registered: Vec::new(),
        }
    }

    /// An evaluator without built-in rules. Member facets are ignored;
    /// only attached and registered rules apply.
    pub fn without_builtins() -> Self {
        Self {
            builtin: Vec::new(),
            registered: Vec::new(),
        }
    }

    /// Add a rule to the end of the pipeline.
    pub fn add(&mut self, rule: Arc<dyn Rule>) {
        self.registered.push(rule);
    }

    /// Builder form of [`RuleEvaluator::add`].
    pub fn with_rule(mut self, rule: Arc<dyn Rule>) -> Self {
        self.add(rule);
        self
    }

    /// Number of rules, built-ins included.
    pub fn len(&self) -> usize {
        self.builtin.len() + self.registered.len()
    }

    /// Whether the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run one phase of the pipeline.
    pub fn consent(
        &self,
        phase: RulePhase,
        subject: &Subject<'_>,
        candidate: Option<&Candidate>,
    ) -> Consent {
        let ctx = RuleContext {
            phase,
            member: subject.member,
            target: subject.target,
            place: subject.place,
            context: subject.context,
            candidate,
        };
        let pipeline = self
            .builtin
            .iter()
            .chain(subject.member_rules)
            .chain(&self.registered);

        for rule in pipeline {
            if !rule.phases().contains(&phase) {
                continue;
            }
            if let Consent::Veto { reason } = rule.check(&ctx) {
                tracing::debug!(
                    member = %subject.member.identifier(),
                    ?phase,
                    place = ?subject.place,
                    user = %subject.context.user(),
                    %reason,
                    "rule vetoed interaction"
                );
                return Consent::Veto { reason };
            }
        }
        Consent::Allow
    }

    /// Evaluate visibility, then usability, then (given a candidate)
    /// validity, stopping at the first phase that vetoes.
    pub fn evaluate(&self, subject: &Subject<'_>, candidate: Option<&Candidate>) -> Evaluation {
        let visible = self.consent(RulePhase::Visibility, subject, None);
        if !visible.is_allowed() {
            return Evaluation::new(visible, None, None);
        }
        let usable = self.consent(RulePhase::Usability, subject, None);
        if !usable.is_allowed() {
            return Evaluation::new(visible, Some(usable), None);
        }
        let valid = candidate.map(|c| self.consent(RulePhase::Validity, subject, Some(c)));
        Evaluation::new(visible, Some(usable), valid)
    }

    /// Validity alone. Callers that skip visibility and usability use this
    /// to report a candidate's problems without enforcing them.
    pub fn validate(&self, subject: &Subject<'_>, candidate: &Candidate) -> Consent {
        self.consent(RulePhase::Validity, subject, Some(candidate))
    }

    /// Fail with `NotFound` unless the member is visible.
    pub fn check_visible(&self, subject: &Subject<'_>) -> Result<(), InteractionError> {
        self.evaluate_phases(subject, None, false)
    }

    /// Fail unless the member is visible, usable and, given a candidate,
    /// accepts it.
    pub fn check(
        &self,
        subject: &Subject<'_>,
        candidate: Option<&Candidate>,
    ) -> Result<(), InteractionError> {
        self.evaluate_phases(subject, candidate, true)
    }

    fn evaluate_phases(
        &self,
        subject: &Subject<'_>,
        candidate: Option<&Candidate>,
        usable: bool,
    ) -> Result<(), InteractionError> {
        let evaluation = if usable {
            self.evaluate(subject, candidate)
        } else {
            Evaluation::new(self.consent(RulePhase::Visibility, subject, None), None, None)
        };
        evaluation.into_result(subject.member, candidate)
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
