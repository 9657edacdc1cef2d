//! Negotiations walk a candidate through validation to submission.
//!
//! ```text
//! Open ──validate──▶ Validated ──submit──▶ Submitted
//!  ▲                    │          └─────▶ Aborted
//!  └──── set_value ◀────┘
//! ```
//!
//! `Submitted` and `Aborted` are terminal. A negotiation dropped before
//! reaching either is aborted, and its session is free for the next one.

use crate::apply;
use crate::session::Session;
use interlock_core::error::InteractionError;
use interlock_core::rule::{Candidate, Consent};
use interlock_core::value::Value;

/// Where a negotiation stands.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    /// Accepting candidates.
    Open,
    /// Validated; setting a candidate reopens it.
    Validated,
    /// Applied to the target. Terminal.
    Submitted,
    /// Gave up, or the submission was refused. Terminal.
    Aborted,
}

impl NegotiationState {
    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Submitted | Self::Aborted)
    }
}

/// Outcome of the last `validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    /// The candidate would be accepted.
    Valid,
    /// The candidate would be refused, and why.
    Invalid(String),
}

impl Validity {
    fn from_consent(consent: Consent) -> Self {
        match consent {
            Consent::Allow => Validity::Valid,
            Consent::Veto { reason } => Validity::Invalid(reason),
        }
    }

    /// Whether this is [`Validity::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }
}

/// Bookkeeping both negotiation kinds share.
struct Progress<'s> {
    session: &'s Session,
    state: NegotiationState,
    validity: Option<Validity>,
}

impl<'s> Progress<'s> {
    fn start(session: &'s Session) -> Result<Self, InteractionError> {
        session.begin_negotiation()?;
        Ok(Self {
            session,
            state: NegotiationState::Open,
            validity: None,
        })
    }

    fn ensure_live(&self) -> Result<(), InteractionError> {
        if self.state.is_terminal() {
            return Err(InteractionError::illegal_state(format!(
                "negotiation for {} is already {:?}",
                self.session.member.identifier(),
                self.state
            )));
        }
        Ok(())
    }

    fn reopen(&mut self) -> Result<(), InteractionError> {
        self.ensure_live()?;
        self.state = NegotiationState::Open;
        self.validity = None;
        Ok(())
    }

    fn validated(&mut self, consent: Consent) -> &Validity {
        self.state = NegotiationState::Validated;
        self.validity.insert(Validity::from_consent(consent))
    }

    fn finish(&mut self, state: NegotiationState) {
        self.state = state;
        self.session.end_negotiation();
        tracing::debug!(
            member = %self.session.member.identifier(),
            ?state,
            "negotiation finished"
        );
    }

    /// Re-check under enforcement, then run `apply`. Either way the
    /// negotiation ends.
    fn submit<R>(
        &mut self,
        candidate: &Candidate,
        apply: impl FnOnce(&Session) -> Result<R, InteractionError>,
    ) -> Result<R, InteractionError> {
        self.ensure_live()?;
        let outcome = self
            .session
            .check(Some(candidate))
            .and_then(|()| apply(self.session));
        match &outcome {
            Ok(_) => self.finish(NegotiationState::Submitted),
            Err(err) => {
                tracing::warn!(
                    member = %self.session.member.identifier(),
                    error = %err,
                    "submission refused"
                );
                self.finish(NegotiationState::Aborted);
            }
        }
        outcome
    }
}

impl Drop for Progress<'_> {
    fn drop(&mut self) {
        if !self.state.is_terminal() {
            self.finish(NegotiationState::Aborted);
        }
    }
}

/// A pending change to one property.
pub struct PropertyNegotiation<'s> {
    progress: Progress<'s>,
    candidate: Value,
}

impl<'s> PropertyNegotiation<'s> {
    pub(crate) fn start(session: &'s Session) -> Result<Self, InteractionError> {
        let current = apply::get_property(&session.target, &session.member.name)?;
        Ok(Self {
            progress: Progress::start(session)?,
            candidate: current,
        })
    }

    /// The candidate; the property's value until one is set.
    pub fn value(&self) -> &Value {
        &self.candidate
    }

    /// Propose `value`, replacing any earlier candidate.
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<(), InteractionError> {
        self.progress.reopen()?;
        self.candidate = value.into();
        Ok(())
    }

    /// Check the candidate's validity without applying it.
    pub fn validate(&mut self) -> Result<Validity, InteractionError> {
        self.progress.ensure_live()?;
        let consent = self
            .progress
            .session
            .validate(&Candidate::Value(self.candidate.clone()))?;
        Ok(self.progress.validated(consent).clone())
    }

    /// Outcome of the last [`PropertyNegotiation::validate`], unless the
    /// candidate changed since.
    pub fn validity(&self) -> Option<&Validity> {
        self.progress.validity.as_ref()
    }

    /// Where the negotiation stands.
    pub fn state(&self) -> NegotiationState {
        self.progress.state
    }

    /// Apply the candidate. Allowed once; the target is left untouched
    /// when rules refuse it.
    pub fn submit(&mut self) -> Result<(), InteractionError> {
        let candidate = Candidate::Value(self.candidate.clone());
        let value = self.candidate.clone();
        self.progress
            .submit(&candidate, |session| apply::set_property(session, value))
    }
}

/// A pending invocation of one action.
pub struct ActionNegotiation<'s> {
    progress: Progress<'s>,
    arguments: Vec<Value>,
}

impl<'s> ActionNegotiation<'s> {
    pub(crate) fn start(session: &'s Session) -> Result<Self, InteractionError> {
        let arity = session.member.parameters.len();
        Ok(Self {
            progress: Progress::start(session)?,
            arguments: vec![Value::Null; arity],
        })
    }

    /// The arguments so far; `null` where none was set.
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Set the argument at `index`.
    pub fn set_argument(
        &mut self,
        index: usize,
        value: impl Into<Value>,
    ) -> Result<(), InteractionError> {
        let arity = self.arguments.len();
        if index >= arity {
            return Err(InteractionError::illegal_state(format!(
                "{} takes {arity} argument(s), no index {index}",
                self.progress.session.member.identifier()
            )));
        }
        self.progress.reopen()?;
        self.arguments[index] = value.into();
        Ok(())
    }

    /// Replace all arguments.
    pub fn set_arguments(&mut self, arguments: Vec<Value>) -> Result<(), InteractionError> {
        self.progress.reopen()?;
        self.arguments = arguments;
        Ok(())
    }

    /// Check the arguments' validity without invoking.
    pub fn validate(&mut self) -> Result<Validity, InteractionError> {
        self.progress.ensure_live()?;
        let consent = self
            .progress
            .session
            .validate(&Candidate::Arguments(self.arguments.clone()))?;
        Ok(self.progress.validated(consent).clone())
    }

    /// Outcome of the last [`ActionNegotiation::validate`], unless the
    /// arguments changed since.
    pub fn validity(&self) -> Option<&Validity> {
        self.progress.validity.as_ref()
    }

    /// Where the negotiation stands.
    pub fn state(&self) -> NegotiationState {
        self.progress.state
    }

    /// Invoke the action and return its result. Allowed once.
    pub fn invoke(&mut self) -> Result<Value, InteractionError> {
        let candidate = Candidate::Arguments(self.arguments.clone());
        let arguments = self.arguments.clone();
        self.progress
            .submit(&candidate, |session| apply::invoke_action(session, arguments))
    }
}
