use crate::managed::{ManagedAction, ManagedProperty};
use interlock_core::context::ExecutionContext;
use interlock_core::control::SyncControl;
use interlock_core::error::InteractionError;
use interlock_core::member::MemberSpec;
use interlock_core::object::ObjectHandle;
use interlock_core::rule::{Candidate, Consent, Rule};
use interlock_rules::{Evaluation, RuleEvaluator, Subject};
use std::cell::Cell;
use std::sync::Arc;

/// State shared by an interaction, its managed member and its
/// negotiations. One per call, never reused.
pub(crate) struct Session {
    pub(crate) target: ObjectHandle,
    pub(crate) member: Arc<MemberSpec>,
    rules: Vec<Arc<dyn Rule>>,
    evaluator: Arc<RuleEvaluator>,
    pub(crate) control: SyncControl,
    pub(crate) context: ExecutionContext,
    negotiating: Cell<bool>,
}

impl Session {
    pub(crate) fn new(
        target: ObjectHandle,
        member: Arc<MemberSpec>,
        rules: Vec<Arc<dyn Rule>>,
        evaluator: Arc<RuleEvaluator>,
        control: SyncControl,
        context: ExecutionContext,
    ) -> Self {
        Self {
            target,
            member,
            rules,
            evaluator,
            control,
            context,
            negotiating: Cell::new(false),
        }
    }

    pub(crate) fn enforced(&self) -> bool {
        self.control.enforcement().is_enforced()
    }

    /// Full evaluation against the target's current state, whatever the
    /// enforcement mode.
    pub(crate) fn evaluate(
        &self,
        candidate: Option<&Candidate>,
    ) -> Result<Evaluation, InteractionError> {
        let evaluation = self.target.read(|object| {
            self.evaluator.evaluate(
                &Subject {
                    member: &self.member,
                    member_rules: &self.rules,
                    target: object,
                    place: self.control.place(),
                    context: &self.context,
                },
                candidate,
            )
        })?;
        Ok(evaluation)
    }

    /// Validity only, whatever the enforcement mode.
    pub(crate) fn validate(&self, candidate: &Candidate) -> Result<Consent, InteractionError> {
        let consent = self.target.read(|object| {
            self.evaluator.validate(
                &Subject {
                    member: &self.member,
                    member_rules: &self.rules,
                    target: object,
                    place: self.control.place(),
                    context: &self.context,
                },
                candidate,
            )
        })?;
        Ok(consent)
    }

    /// Visibility, usability and (given a candidate) validity. A no-op
    /// when rules are skipped.
    pub(crate) fn check(&self, candidate: Option<&Candidate>) -> Result<(), InteractionError> {
        if !self.enforced() {
            return Ok(());
        }
        self.evaluate(candidate)?
            .into_result(&self.member, candidate)
    }

    /// Visibility alone. A no-op when rules are skipped.
    pub(crate) fn check_visible(&self) -> Result<(), InteractionError> {
        if !self.enforced() {
            return Ok(());
        }
        self.target.read(|object| {
            self.evaluator.check_visible(&Subject {
                member: &self.member,
                member_rules: &self.rules,
                target: object,
                place: self.control.place(),
                context: &self.context,
            })
        })?
    }

    /// Claim the session for a negotiation.
    pub(crate) fn begin_negotiation(&self) -> Result<(), InteractionError> {
        if self.negotiating.replace(true) {
            return Err(InteractionError::illegal_state(format!(
                "a negotiation for {} is already open",
                self.member.identifier()
            )));
        }
        Ok(())
    }

    pub(crate) fn end_negotiation(&self) {
        self.negotiating.set(false);
    }
}

/// An interaction with one property, before visibility is settled.
pub struct PropertyInteraction {
    session: Session,
}

impl PropertyInteraction {
    pub(crate) fn new(session: Session) -> Self {
        Self { session }
    }

    /// The property.
    pub fn member(&self) -> &MemberSpec {
        &self.session.member
    }

    /// Evaluate visibility and usability now, whatever the enforcement
    /// mode.
    pub fn evaluate(&self) -> Result<Evaluation, InteractionError> {
        self.session.evaluate(None)
    }

    /// The managed property if it is visible, or when rules are skipped.
    /// Otherwise `f` turns the `NotFound` into the caller's error.
    pub fn managed_property_else<E>(
        self,
        f: impl FnOnce(InteractionError) -> E,
    ) -> Result<ManagedProperty, E> {
        match self.session.check_visible() {
            Ok(()) => Ok(ManagedProperty::new(self.session)),
            Err(err) => Err(f(err)),
        }
    }

    /// [`PropertyInteraction::managed_property_else`] keeping the
    /// interaction error.
    pub fn managed_property(self) -> Result<ManagedProperty, InteractionError> {
        self.managed_property_else(|err| err)
    }
}

/// An interaction with one action, before visibility is settled.
pub struct ActionInteraction {
    session: Session,
}

impl ActionInteraction {
    pub(crate) fn new(session: Session) -> Self {
        Self { session }
    }

    /// The action.
    pub fn member(&self) -> &MemberSpec {
        &self.session.member
    }

    /// Evaluate visibility and usability now, whatever the enforcement
    /// mode.
    pub fn evaluate(&self) -> Result<Evaluation, InteractionError> {
        self.session.evaluate(None)
    }

    /// The managed action if it is visible, or when rules are skipped.
    /// Otherwise `f` turns the `NotFound` into the caller's error.
    pub fn managed_action_else<E>(
        self,
        f: impl FnOnce(InteractionError) -> E,
    ) -> Result<ManagedAction, E> {
        match self.session.check_visible() {
            Ok(()) => Ok(ManagedAction::new(self.session)),
            Err(err) => Err(f(err)),
        }
    }

    /// [`ActionInteraction::managed_action_else`] keeping the interaction
    /// error.
    pub fn managed_action(self) -> Result<ManagedAction, InteractionError> {
        self.managed_action_else(|err| err)
    }
}
