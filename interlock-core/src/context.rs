//! Execution context: who is acting, and in which transaction.
//!
//! The context travels explicitly through every interaction. In addition,
//! while a mediated call runs, it is installed as a tokio task-local so
//! domain code can ask [`ExecutionContext::current`] without having it
//! threaded through its own signatures. Background tasks get the context of
//! the call that spawned them, not of whatever thread happens to run them.

use crate::id::UserId;
use crate::transaction::TransactionContext;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

tokio::task_local! {
    static CURRENT: ExecutionContext;
}

/// Identity and transaction snapshot for one interaction.
#[derive(Clone)]
pub struct ExecutionContext {
    user: UserId,
    roles: Vec<String>,
    transaction: Option<Arc<dyn TransactionContext>>,
}

impl ExecutionContext {
    /// Context for `user` with no roles and no transaction.
    pub fn new(user: impl Into<UserId>) -> Self {
        Self {
            user: user.into(),
            roles: Vec::new(),
            transaction: None,
        }
    }

    /// Context for framework-initiated work.
    pub fn system() -> Self {
        Self::new("__system")
    }

    /// Add a role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Bind a transaction; mutations record their events into it.
    pub fn with_transaction(mut self, transaction: Arc<dyn TransactionContext>) -> Self {
        self.transaction = Some(transaction);
        self
    }

    /// The acting user.
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// The acting user's roles.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Whether the acting user has `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// The bound transaction, if any.
    pub fn transaction(&self) -> Option<&Arc<dyn TransactionContext>> {
        self.transaction.as_ref()
    }

    /// The context installed for the running call, if any.
    pub fn current() -> Option<ExecutionContext> {
        CURRENT.try_with(|ctx| ctx.clone()).ok()
    }

    /// Run `f` with this context installed as current.
    pub fn scope_sync<R>(self, f: impl FnOnce() -> R) -> R {
        CURRENT.sync_scope(self, f)
    }

    /// Run `future` with this context installed as current.
    pub async fn scope<F: Future>(self, future: F) -> F::Output {
        CURRENT.scope(self, future).await
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("user", &self.user)
            .field("roles", &self.roles)
            .field("transaction", &self.transaction.as_ref().map(|tx| tx.id()))
            .finish()
    }
}
