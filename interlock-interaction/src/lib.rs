#![deny(missing_docs)]
//! Mediated interaction with domain objects.
//!
//! An interaction starts from an [`InteractionService`], which resolves a
//! member name against the metamodel and binds the rule pipeline:
//!
//! ```text
//! start_property ─▶ managed_property_else ─▶ start_negotiation
//!                                              │ set_value*
//!                                              │ validate?
//!                                              ▼
//!                                            submit ─▶ target mutated, one event recorded
//! ```
//!
//! Actions follow the same path with [`InteractionService::start_action`],
//! arguments instead of a value, and `invoke` instead of `submit`.
//!
//! Every mutation goes through one place, which refuses to run without an
//! active transaction in the [`ExecutionContext`] and records exactly one
//! [`LifecycleEvent`](interlock_core::LifecycleEvent) into it afterwards.
//! [`ObjectLifecycle`] records the events that are not member interactions:
//! creation, loading, persisting and removal.

mod apply;
mod lifecycle;
mod managed;
mod negotiation;
mod session;

pub use interlock_rules::Evaluation;
pub use lifecycle::ObjectLifecycle;
pub use managed::{ManagedAction, ManagedProperty};
pub use negotiation::{ActionNegotiation, NegotiationState, PropertyNegotiation, Validity};
pub use session::{ActionInteraction, PropertyInteraction};

use interlock_core::context::ExecutionContext;
use interlock_core::control::SyncControl;
use interlock_core::error::InteractionError;
use interlock_core::member::MemberKind;
use interlock_core::metamodel::Metamodel;
use interlock_core::object::ObjectHandle;
use interlock_rules::RuleEvaluator;
use session::Session;
use std::sync::Arc;

/// Entry point for member interactions: a metamodel plus a rule pipeline.
///
/// Cheap to clone; clones share both.
#[derive(Clone)]
pub struct InteractionService {
    metamodel: Arc<dyn Metamodel>,
    evaluator: Arc<RuleEvaluator>,
}

impl InteractionService {
    /// Create a service over `metamodel`, checking with `evaluator`.
    pub fn new(metamodel: Arc<dyn Metamodel>, evaluator: Arc<RuleEvaluator>) -> Self {
        Self {
            metamodel,
            evaluator,
        }
    }

    /// Create a service that checks only the built-in facet rules and
    /// whatever the metamodel attaches.
    pub fn with_default_rules(metamodel: Arc<dyn Metamodel>) -> Self {
        Self::new(metamodel, Arc::new(RuleEvaluator::new()))
    }

    /// The metamodel members are resolved against.
    pub fn metamodel(&self) -> &Arc<dyn Metamodel> {
        &self.metamodel
    }

    /// The rule pipeline.
    pub fn evaluator(&self) -> &Arc<RuleEvaluator> {
        &self.evaluator
    }

    /// Start interacting with the property `name` of `target`.
    ///
    /// Fails with `NotFound` if the target's type has no such property.
    /// Visibility is not checked yet; see
    /// [`PropertyInteraction::managed_property_else`].
    pub fn start_property(
        &self,
        target: &ObjectHandle,
        name: &str,
        control: &SyncControl,
        context: &ExecutionContext,
    ) -> Result<PropertyInteraction, InteractionError> {
        self.open(target, name, MemberKind::Property, control, context)
            .map(PropertyInteraction::new)
    }

    /// Start interacting with the action `name` of `target`.
    pub fn start_action(
        &self,
        target: &ObjectHandle,
        name: &str,
        control: &SyncControl,
        context: &ExecutionContext,
    ) -> Result<ActionInteraction, InteractionError> {
        self.open(target, name, MemberKind::Action, control, context)
            .map(ActionInteraction::new)
    }

    fn open(
        &self,
        target: &ObjectHandle,
        name: &str,
        kind: MemberKind,
        control: &SyncControl,
        context: &ExecutionContext,
    ) -> Result<Session, InteractionError> {
        let member = self
            .metamodel
            .resolve_member(target.object_type(), name)
            .filter(|spec| spec.kind == kind)
            .ok_or_else(|| InteractionError::not_found(format!("{}#{name}", target.object_type())))?;
        let rules = self.metamodel.rules(&member);

        tracing::debug!(
            target_object = %target.bookmark(),
            member = %member.identifier(),
            enforcement = ?control.enforcement(),
            place = ?control.place(),
            user = %context.user(),
            "interaction started"
        );

        Ok(Session::new(
            target.clone(),
            member,
            rules,
            Arc::clone(&self.evaluator),
            *control,
            context.clone(),
        ))
    }
}

impl std::fmt::Debug for InteractionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionService")
            .field("rules", &self.evaluator.len())
            .finish_non_exhaustive()
    }
}
