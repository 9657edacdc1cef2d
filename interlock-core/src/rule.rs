//! The Rule protocol: vetoing visibility, usability and validity.

use crate::context::ExecutionContext;
use crate::member::{MemberSpec, Where};
use crate::object::DomainObject;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Which question a rule is answering.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulePhase {
    /// May the member be seen at all?
    Visibility,
    /// May the member be changed or invoked?
    Usability,
    /// Is this particular value or argument list acceptable?
    Validity,
}

/// A proposed property value or action argument list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Candidate {
    /// New value for a property.
    Value(Value),
    /// Positional arguments for an action.
    Arguments(Vec<Value>),
}

impl Candidate {
    /// The candidate as one value; arguments become an array.
    pub fn to_value(&self) -> Value {
        match self {
            Candidate::Value(v) => v.clone(),
            Candidate::Arguments(args) => Value::Array(args.clone()),
        }
    }
}

/// The outcome of one rule, or of a whole phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consent {
    /// No objection.
    Allow,
    /// Objection, with a reason meant for the end user.
    Veto {
        /// Why.
        reason: String,
    },
}

impl Consent {
    /// Build a veto.
    pub fn veto(reason: impl Into<String>) -> Self {
        Consent::Veto {
            reason: reason.into(),
        }
    }

    /// Whether this is [`Consent::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Consent::Allow)
    }

    /// The veto reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Consent::Allow => None,
            Consent::Veto { reason } => Some(reason),
        }
    }
}

/// What a rule may look at. Read-only: rules decide, they never mutate.
pub struct RuleContext<'a> {
    /// The question being asked.
    pub phase: RulePhase,
    /// The member in question.
    pub member: &'a MemberSpec,
    /// The instance the member belongs to.
    pub target: &'a dyn DomainObject,
    /// Where the interaction happens.
    pub place: Where,
    /// Who is asking, and in which transaction.
    pub context: &'a ExecutionContext,
    /// The proposed value; only set in [`RulePhase::Validity`].
    pub candidate: Option<&'a Candidate>,
}

/// Protocol ③ — Rules
///
/// A rule objects to an interaction at one or more phases. Rules are pure:
/// given the same context they must give the same answer, and they must
/// not mutate the target. They are re-evaluated on every interaction,
/// never cached, because object and session state move on.
///
/// Implementations:
/// - facet rules reading [`MemberSpec`] (hidden-where, disabled, types)
/// - per-member rules the metamodel attaches (e.g. "disable when sold")
/// - cross-cutting rules (e.g. role checks) registered on the evaluator
pub trait Rule: Send + Sync {
    /// Which phases this rule answers.
    fn phases(&self) -> &[RulePhase];

    /// Decide.
    fn check(&self, ctx: &RuleContext<'_>) -> Consent;
}
