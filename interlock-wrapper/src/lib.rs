#![deny(missing_docs)]
//! Wrapper proxies for domain objects.
//!
//! [`WrapperFactory::wrap`] returns a [`Wrapped`] whose `get`, `set` and
//! `invoke` each start an interaction, negotiate with the call's arguments
//! and forward to the object, all on the caller's thread.
//! [`WrapperFactory::async_wrap`] returns an [`AsyncWrapped`] that does the
//! same on a background task, carrying the execution context with it.
//!
//! Typed access is written per domain type as a trait over the wrapper:
//!
//! ```text
//! trait BookApi {
//!     fn name(&self) -> Result<String, InteractionError>;
//!     fn double_the_price(&self) -> Result<f64, InteractionError>;
//! }
//!
//! impl BookApi for Wrapped<Book> { ... }
//! ```

mod async_wrapped;
mod call;
mod result;
mod wrapped;

pub use async_wrapped::AsyncWrapped;
pub use call::MemberCall;
pub use result::AsyncResult;
pub use wrapped::Wrapped;

use call::Binding;
use interlock_core::context::ExecutionContext;
use interlock_core::control::{AsyncControl, SyncControl};
use interlock_core::error::InteractionError;
use interlock_core::object::{DomainObject, ObjectHandle, Shared};
use interlock_interaction::InteractionService;

/// Makes wrappers that route through one [`InteractionService`].
#[derive(Debug, Clone)]
pub struct WrapperFactory {
    service: InteractionService,
}

impl WrapperFactory {
    /// Wrap objects using `service`.
    pub fn new(service: InteractionService) -> Self {
        Self { service }
    }

    /// The service calls go through.
    pub fn service(&self) -> &InteractionService {
        &self.service
    }

    /// Wrap `target` for calls on the caller's thread, made as `context`.
    pub fn wrap<T: DomainObject>(
        &self,
        target: &Shared<T>,
        control: SyncControl,
        context: ExecutionContext,
    ) -> Result<Wrapped<T>, InteractionError> {
        let binding = self.bind(target, control, context)?;
        Ok(Wrapped::new(binding, target.clone()))
    }

    /// Wrap `target` for background calls.
    ///
    /// The calls run under the control's context if it has one, otherwise
    /// under the context of the interaction this is called from. Without
    /// either the wrap fails with `IllegalState`.
    pub fn async_wrap<T: DomainObject>(
        &self,
        target: &Shared<T>,
        control: AsyncControl,
    ) -> Result<AsyncWrapped<T>, InteractionError> {
        let context = control
            .context()
            .cloned()
            .or_else(ExecutionContext::current)
            .ok_or_else(|| InteractionError::illegal_state("no execution context to propagate"))?;
        let binding = self.bind(target, control.sync_control(), context)?;
        Ok(AsyncWrapped::new(binding, target.clone(), control.timeout()))
    }

    fn bind<T: DomainObject>(
        &self,
        target: &Shared<T>,
        control: SyncControl,
        context: ExecutionContext,
    ) -> Result<Binding, InteractionError> {
        Ok(Binding {
            service: self.service.clone(),
            handle: ObjectHandle::from_shared(target)?,
            control,
            context,
        })
    }
}
