use crate::call::{Binding, MemberCall};
use interlock_core::context::ExecutionContext;
use interlock_core::control::SyncControl;
use interlock_core::error::InteractionError;
use interlock_core::object::{DomainObject, Shared};
use interlock_core::value::Value;
use std::fmt;

/// A domain object whose member calls go through the rule pipeline on the
/// caller's thread.
///
/// Rule failures come back as errors from the call itself and leave the
/// object untouched. Domain types usually get a capability trait
/// implemented on `Wrapped<T>` that turns these name-based calls into
/// typed methods.
pub struct Wrapped<T: DomainObject> {
    binding: Binding,
    target: Shared<T>,
}

impl<T: DomainObject> Wrapped<T> {
    pub(crate) fn new(binding: Binding, target: Shared<T>) -> Self {
        Self { binding, target }
    }

    /// The unmediated object.
    pub fn target(&self) -> &Shared<T> {
        &self.target
    }

    /// How calls are checked.
    pub fn control(&self) -> SyncControl {
        self.binding.control
    }

    /// Who the calls are made as.
    pub fn context(&self) -> &ExecutionContext {
        &self.binding.context
    }

    /// Read a property.
    pub fn get(&self, property: &str) -> Result<Value, InteractionError> {
        self.call(MemberCall::get(property))
    }

    /// Write a property.
    pub fn set(&self, property: &str, value: impl Into<Value>) -> Result<(), InteractionError> {
        self.call(MemberCall::set(property, value)).map(|_| ())
    }

    /// Invoke an action.
    pub fn invoke(&self, action: &str, arguments: Vec<Value>) -> Result<Value, InteractionError> {
        self.call(MemberCall::invoke(action, arguments))
    }

    /// Run any call. `Set` returns `null`.
    pub fn call(&self, call: MemberCall) -> Result<Value, InteractionError> {
        let _span = tracing::debug_span!(
            "wrapped_call",
            target_object = %self.binding.handle.bookmark(),
            member = call.member_name(),
        )
        .entered();
        self.binding.execute(call)
    }
}

impl<T: DomainObject> fmt::Debug for Wrapped<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapped")
            .field("target", self.binding.handle.bookmark())
            .field("control", &self.binding.control)
            .field("context", &self.binding.context)
            .finish()
    }
}
