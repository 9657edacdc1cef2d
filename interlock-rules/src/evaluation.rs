use interlock_core::error::InteractionError;
use interlock_core::member::MemberSpec;
use interlock_core::rule::{Candidate, Consent};
use interlock_core::value::Value;

/// The outcome of evaluating one member.
///
/// A phase that was never reached, because an earlier one vetoed or no
/// candidate was given, is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Visibility consent. Always evaluated.
    pub visible: Consent,
    /// Usability consent; `None` when hidden.
    pub usable: Option<Consent>,
    /// Validity consent; `None` when hidden, disabled or without candidate.
    pub valid: Option<Consent>,
}

impl Evaluation {
    pub(crate) fn new(visible: Consent, usable: Option<Consent>, valid: Option<Consent>) -> Self {
        Self {
            visible,
            usable,
            valid,
        }
    }

    /// Whether the member may be seen.
    pub fn is_visible(&self) -> bool {
        self.visible.is_allowed()
    }

    /// Whether the member may be seen and used.
    pub fn is_usable(&self) -> bool {
        self.is_visible() && self.usable.as_ref().is_some_and(Consent::is_allowed)
    }

    /// Map the first veto to its error. `member` and `candidate` must be
    /// the ones the evaluation was made for.
    pub fn into_result(
        self,
        member: &MemberSpec,
        candidate: Option<&Candidate>,
    ) -> Result<(), InteractionError> {
        if let Consent::Veto { .. } = self.visible {
            return Err(InteractionError::not_found(member.identifier()));
        }
        if let Some(Consent::Veto { reason }) = self.usable {
            return Err(InteractionError::Disabled {
                member: member.identifier(),
                reason,
            });
        }
        if let Some(Consent::Veto { reason }) = self.valid {
            return Err(InteractionError::Invalid {
                member: member.identifier(),
                candidate: candidate.map(Candidate::to_value).unwrap_or(Value::Null),
                reason,
            });
        }
        Ok(())
    }
}
