use interlock_core::context::ExecutionContext;
use interlock_core::control::SyncControl;
use interlock_core::error::InteractionError;
use interlock_core::object::ObjectHandle;
use interlock_core::value::Value;
use interlock_interaction::InteractionService;
use serde::{Deserialize, Serialize};

/// One call on a wrapped object.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum MemberCall {
    /// Read a property.
    Get {
        /// Property name.
        property: String,
    },
    /// Write a property.
    Set {
        /// Property name.
        property: String,
        /// New value.
        value: Value,
    },
    /// Invoke an action.
    Invoke {
        /// Action name.
        action: String,
        /// Positional arguments.
        arguments: Vec<Value>,
    },
}

impl MemberCall {
    /// Read `property`.
    pub fn get(property: impl Into<String>) -> Self {
        Self::Get {
            property: property.into(),
        }
    }

    /// Write `value` into `property`.
    pub fn set(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Set {
            property: property.into(),
            value: value.into(),
        }
    }

    /// Invoke `action` with `arguments`.
    pub fn invoke(action: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self::Invoke {
            action: action.into(),
            arguments,
        }
    }

    /// The member the call addresses.
    pub fn member_name(&self) -> &str {
        match self {
            Self::Get { property } | Self::Set { property, .. } => property,
            Self::Invoke { action, .. } => action,
        }
    }
}

/// Everything a call needs besides the call itself.
#[derive(Clone)]
pub(crate) struct Binding {
    pub(crate) service: InteractionService,
    pub(crate) handle: ObjectHandle,
    pub(crate) control: SyncControl,
    pub(crate) context: ExecutionContext,
}

impl Binding {
    /// Run `call` through a fresh interaction. `Set` yields `null`.
    pub(crate) fn execute(&self, call: MemberCall) -> Result<Value, InteractionError> {
        let Self {
            service,
            handle,
            control,
            context,
        } = self;
        match call {
            MemberCall::Get { property } => service
                .start_property(handle, &property, control, context)?
                .managed_property()?
                .value(),
            MemberCall::Set { property, value } => {
                service
                    .start_property(handle, &property, control, context)?
                    .managed_property()?
                    .set_value(value)?;
                Ok(Value::Null)
            }
            MemberCall::Invoke { action, arguments } => service
                .start_action(handle, &action, control, context)?
                .managed_action()?
                .invoke(arguments),
        }
    }

    /// What `execute` would refuse on rule grounds, without executing.
    /// Only name resolution is checked when rules are skipped.
    pub(crate) fn admit(&self, call: &MemberCall) -> Result<(), InteractionError> {
        let Self {
            service,
            handle,
            control,
            context,
        } = self;
        let enforced = control.enforcement().is_enforced();
        match call {
            MemberCall::Get { property } => {
                service
                    .start_property(handle, property, control, context)?
                    .managed_property()?;
            }
            MemberCall::Set { property, value } => {
                let managed = service
                    .start_property(handle, property, control, context)?
                    .managed_property()?;
                if enforced {
                    managed.verify_value(value)?;
                }
            }
            MemberCall::Invoke { action, arguments } => {
                let managed = service
                    .start_action(handle, action, control, context)?
                    .managed_action()?;
                if enforced {
                    managed.verify_arguments(arguments)?;
                }
            }
        }
        Ok(())
    }
}
