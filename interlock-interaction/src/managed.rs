use crate::apply;
use crate::negotiation::{ActionNegotiation, PropertyNegotiation};
use crate::session::Session;
use interlock_core::error::InteractionError;
use interlock_core::member::{MemberSpec, ParamSpec};
use interlock_core::object::ObjectHandle;
use interlock_core::rule::Candidate;
use interlock_core::value::Value;

/// A property that passed the visibility check (or whose rules are
/// skipped). Negotiations are started from here, one at a time.
pub struct ManagedProperty {
    session: Session,
}

impl ManagedProperty {
    pub(crate) fn new(session: Session) -> Self {
        Self { session }
    }

    /// The property.
    pub fn member(&self) -> &MemberSpec {
        &self.session.member
    }

    /// The object the property belongs to.
    pub fn target(&self) -> &ObjectHandle {
        &self.session.target
    }

    /// The property's current value. Reading records no event.
    pub fn value(&self) -> Result<Value, InteractionError> {
        self.session.check_visible()?;
        apply::get_property(&self.session.target, &self.session.member.name)
    }

    /// What submitting `value` under enforcement would say, whatever the
    /// session's own enforcement mode.
    pub fn verify_value(&self, value: &Value) -> Result<(), InteractionError> {
        let candidate = Candidate::Value(value.clone());
        self.session
            .evaluate(Some(&candidate))?
            .into_result(&self.session.member, Some(&candidate))
    }

    /// Open a negotiation seeded with the current value.
    ///
    /// Fails with `IllegalState` while another negotiation of this property
    /// is still open.
    pub fn start_negotiation(&self) -> Result<PropertyNegotiation<'_>, InteractionError> {
        PropertyNegotiation::start(&self.session)
    }

    /// Negotiate and submit `value` in one step.
    pub fn set_value(&self, value: impl Into<Value>) -> Result<(), InteractionError> {
        let mut negotiation = self.start_negotiation()?;
        negotiation.set_value(value)?;
        negotiation.submit()
    }
}

/// An action that passed the visibility check (or whose rules are
/// skipped).
pub struct ManagedAction {
    session: Session,
}

impl ManagedAction {
    pub(crate) fn new(session: Session) -> Self {
        Self { session }
    }

    /// The action.
    pub fn member(&self) -> &MemberSpec {
        &self.session.member
    }

    /// The object the action belongs to.
    pub fn target(&self) -> &ObjectHandle {
        &self.session.target
    }

    /// Declared parameters, in order.
    pub fn parameters(&self) -> &[ParamSpec] {
        &self.session.member.parameters
    }

    /// What invoking with `arguments` under enforcement would say.
    pub fn verify_arguments(&self, arguments: &[Value]) -> Result<(), InteractionError> {
        let candidate = Candidate::Arguments(arguments.to_vec());
        self.session
            .evaluate(Some(&candidate))?
            .into_result(&self.session.member, Some(&candidate))
    }

    /// Open a negotiation with every argument unset.
    pub fn start_negotiation(&self) -> Result<ActionNegotiation<'_>, InteractionError> {
        ActionNegotiation::start(&self.session)
    }

    /// Negotiate and invoke with `arguments` in one step.
    pub fn invoke(&self, arguments: Vec<Value>) -> Result<Value, InteractionError> {
        let mut negotiation = self.start_negotiation()?;
        negotiation.set_arguments(arguments)?;
        negotiation.invoke()
    }
}
