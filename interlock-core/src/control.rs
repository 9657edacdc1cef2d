//! Execution control: how strictly a mediated call is checked, and where
//! an async call runs.

use crate::context::ExecutionContext;
use crate::duration::DurationMs;
use crate::member::Where;
use crate::transaction::TransactionContext;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Whether visibility, usability and validity rules are applied.
///
/// `Skip` bypasses the checks, never the mutation or invocation itself. It
/// exists for fixtures and framework-internal callers, not for untrusted
/// input.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Enforcement {
    /// Apply all rules.
    #[default]
    Enforce,
    /// Apply none.
    Skip,
}

impl Enforcement {
    /// Whether rules are applied.
    pub fn is_enforced(self) -> bool {
        self == Enforcement::Enforce
    }
}

/// Control for calls that run on the caller's thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncControl {
    enforcement: Enforcement,
    place: Where,
}

impl SyncControl {
    /// Enforce rules, interacting as if from an object form.
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Bypass rule checks.
    pub fn with_skip_rules(mut self) -> Self {
        self.enforcement = Enforcement::Skip;
        self
    }

    /// Apply rule checks.
    pub fn with_check_rules(mut self) -> Self {
        self.enforcement = Enforcement::Enforce;
        self
    }

    /// Interact as if from `place`.
    pub fn with_place(mut self, place: Where) -> Self {
        self.place = place;
        self
    }

    /// The enforcement mode.
    pub fn enforcement(&self) -> Enforcement {
        self.enforcement
    }

    /// Where the interaction happens.
    pub fn place(&self) -> Where {
        self.place
    }
}

/// Control for calls dispatched to a background task.
#[derive(Debug, Clone, Default)]
pub struct AsyncControl {
    sync: SyncControl,
    context: Option<ExecutionContext>,
    timeout: Option<DurationMs>,
}

impl AsyncControl {
    /// How long [`AsyncControl::timeout`] waits when none was configured.
    pub const DEFAULT_TIMEOUT: DurationMs = DurationMs::from_secs(10);

    /// Enforce rules, inherit the caller's context, wait up to ten seconds.
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Bypass rule checks.
    pub fn with_skip_rules(mut self) -> Self {
        self.sync = self.sync.with_skip_rules();
        self
    }

    /// Apply rule checks.
    pub fn with_check_rules(mut self) -> Self {
        self.sync = self.sync.with_check_rules();
        self
    }

    /// Interact as if from `place`.
    pub fn with_place(mut self, place: Where) -> Self {
        self.sync = self.sync.with_place(place);
        self
    }

    /// Run the task under `context` instead of the caller's.
    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Default wait used by `get()` on the result handle.
    pub fn with_timeout(mut self, timeout: impl Into<DurationMs>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    /// The enforcement mode.
    pub fn enforcement(&self) -> Enforcement {
        self.sync.enforcement()
    }

    /// Where the interaction happens.
    pub fn place(&self) -> Where {
        self.sync.place()
    }

    /// The rule-checking half of this control.
    pub fn sync_control(&self) -> SyncControl {
        self.sync
    }

    /// The configured context, if any.
    pub fn context(&self) -> Option<&ExecutionContext> {
        self.context.as_ref()
    }

    /// The default wait.
    pub fn timeout(&self) -> DurationMs {
        self.timeout.unwrap_or(Self::DEFAULT_TIMEOUT)
    }
}

/// Serializable form of execution control, e.g. from a config file.
///
/// ```
/// use interlock_core::{ControlConfig, Enforcement};
///
/// let config: ControlConfig =
///     serde_json::from_str(r#"{"enforcement": "skip", "user": "fixtures", "timeout": 2500}"#)
///         .unwrap();
/// assert_eq!(config.enforcement, Enforcement::Skip);
/// assert_eq!(config.timeout.as_millis(), 2500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Whether rules are checked.
    pub enforcement: Enforcement,
    /// Where interactions happen.
    pub place: Where,
    /// User to propagate into async tasks. Unset means the caller's.
    pub user: Option<String>,
    /// Roles of `user`.
    pub roles: Vec<String>,
    /// Default async wait.
    pub timeout: DurationMs,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            enforcement: Enforcement::Enforce,
            place: Where::ObjectForms,
            user: None,
            roles: Vec::new(),
            timeout: AsyncControl::DEFAULT_TIMEOUT,
        }
    }
}

impl ControlConfig {
    /// Control for sync calls.
    pub fn sync_control(&self) -> SyncControl {
        let control = SyncControl::defaults().with_place(self.place);
        match self.enforcement {
            Enforcement::Enforce => control.with_check_rules(),
            Enforcement::Skip => control.with_skip_rules(),
        }
    }

    /// Control for async calls. When a user is configured, the task runs as
    /// that user inside `transaction`.
    pub fn async_control(&self, transaction: Option<Arc<dyn TransactionContext>>) -> AsyncControl {
        let mut control = AsyncControl {
            sync: self.sync_control(),
            context: None,
            timeout: Some(self.timeout),
        };
        if let Some(user) = &self.user {
            let mut context = self
                .roles
                .iter()
                .fold(ExecutionContext::new(user.as_str()), |ctx, role| {
                    ctx.with_role(role.as_str())
                });
            if let Some(transaction) = transaction {
                context = context.with_transaction(transaction);
            }
            control.context = Some(context);
        }
        control
    }
}
