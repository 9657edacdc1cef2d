#![deny(missing_docs)]
//! # interlock — umbrella crate
//!
//! One import surface for the interlock crates. Re-exports the protocol
//! crate and the implementations behind feature flags, plus a `prelude`
//! for the common path: register a metamodel, begin a transaction, wrap an
//! object, call it, commit.

#[cfg(feature = "core")]
pub use interlock_core;
#[cfg(feature = "interaction")]
pub use interlock_interaction;
#[cfg(feature = "metamodel")]
pub use interlock_metamodel;
#[cfg(feature = "publish")]
pub use interlock_publish;
#[cfg(feature = "core")]
pub use interlock_rules;
#[cfg(feature = "trace")]
pub use interlock_trace;
#[cfg(feature = "wrapper")]
pub use interlock_wrapper;

/// Common-path imports.
pub mod prelude {
    #[cfg(feature = "core")]
    pub use interlock_core::{
        AsyncControl, Bookmark, Candidate, Consent, ControlConfig, DomainObject, DurationMs,
        Enforcement, EventKind, ExecutionContext, InteractionError, LifecycleEvent,
        LifecycleListener, MemberKind, MemberSpec, Metamodel, ObjectError, ObjectHandle,
        ParamSpec, Rule, RuleContext, RulePhase, Shared, SyncControl, TransactionContext,
        TransactionError, Value, ValueType, Where,
    };

    #[cfg(feature = "core")]
    pub use interlock_rules::{Evaluation, RuleEvaluator};

    #[cfg(feature = "metamodel")]
    pub use interlock_metamodel::MetamodelRegistry;

    #[cfg(feature = "interaction")]
    pub use interlock_interaction::{
        ActionNegotiation, InteractionService, ManagedAction, ManagedProperty, NegotiationState,
        ObjectLifecycle, PropertyNegotiation, Validity,
    };

    #[cfg(feature = "publish")]
    pub use interlock_publish::{CommitReport, Transaction, TransactionManager, TransactionState};

    #[cfg(feature = "wrapper")]
    pub use interlock_wrapper::{AsyncResult, AsyncWrapped, MemberCall, Wrapped, WrapperFactory};

    #[cfg(feature = "trace")]
    pub use interlock_trace::{TraceConfig, TracingListener};
}
