use crate::call::{Binding, MemberCall};
use crate::result::AsyncResult;
use interlock_core::context::ExecutionContext;
use interlock_core::duration::DurationMs;
use interlock_core::error::InteractionError;
use interlock_core::object::{DomainObject, Shared};
use interlock_core::value::Value;
use std::fmt;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

/// A domain object whose member calls run as background tasks.
///
/// Under enforcement a call is checked on the caller's thread first, so a
/// hidden, disabled or invalid member fails the call right away and
/// nothing is dispatched. Admitted calls run on tokio's blocking pool with
/// the execution context installed, re-check the rules against the
/// object's state at that point, and report through an [`AsyncResult`].
pub struct AsyncWrapped<T: DomainObject> {
    binding: Binding,
    target: Shared<T>,
    timeout: DurationMs,
}

impl<T: DomainObject> AsyncWrapped<T> {
    pub(crate) fn new(binding: Binding, target: Shared<T>, timeout: DurationMs) -> Self {
        Self {
            binding,
            target,
            timeout,
        }
    }

    /// The unmediated object.
    pub fn target(&self) -> &Shared<T> {
        &self.target
    }

    /// The context background calls run under.
    pub fn context(&self) -> &ExecutionContext {
        &self.binding.context
    }

    /// Dispatch `call` and hand back its eventual value. `Set` yields
    /// `null`.
    pub fn call_async(&self, call: MemberCall) -> Result<AsyncResult<Value>, InteractionError> {
        self.dispatch(call, |value| value)
    }

    /// Dispatch `call` for its effect only.
    pub fn accept_async(&self, call: MemberCall) -> Result<AsyncResult<()>, InteractionError> {
        self.dispatch(call, |_| ())
    }

    /// Read a property in the background.
    pub fn get_async(&self, property: &str) -> Result<AsyncResult<Value>, InteractionError> {
        self.call_async(MemberCall::get(property))
    }

    /// Write a property in the background.
    pub fn set_async(
        &self,
        property: &str,
        value: impl Into<Value>,
    ) -> Result<AsyncResult<()>, InteractionError> {
        self.accept_async(MemberCall::set(property, value))
    }

    /// Invoke an action in the background.
    pub fn invoke_async(
        &self,
        action: &str,
        arguments: Vec<Value>,
    ) -> Result<AsyncResult<Value>, InteractionError> {
        self.call_async(MemberCall::invoke(action, arguments))
    }

    fn dispatch<R: Send + 'static>(
        &self,
        call: MemberCall,
        map: impl FnOnce(Value) -> R + Send + 'static,
    ) -> Result<AsyncResult<R>, InteractionError> {
        self.binding.admit(&call)?;
        let runtime = Handle::try_current()
            .map_err(|_| InteractionError::illegal_state("async calls need a tokio runtime"))?;

        let span = tracing::debug_span!(
            "async_call",
            target_object = %self.binding.handle.bookmark(),
            member = call.member_name(),
            user = %self.binding.context.user(),
        );
        let binding = self.binding.clone();
        let (sender, receiver) = oneshot::channel();

        runtime.spawn_blocking(move || {
            let _entered = span.enter();
            let context = binding.context.clone();
            let outcome = context.scope_sync(|| binding.execute(call)).map(map);
            if let Err(err) = &outcome {
                tracing::debug!(error = %err, "async call failed");
            }
            if sender.send(outcome).is_err() {
                tracing::debug!("async result dropped before retrieval");
            }
        });

        Ok(AsyncResult::new(receiver, self.timeout))
    }
}

impl<T: DomainObject> fmt::Debug for AsyncWrapped<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncWrapped")
            .field("target", self.binding.handle.bookmark())
            .field("control", &self.binding.control)
            .field("context", &self.binding.context)
            .field("timeout", &self.timeout)
            .finish()
    }
}
