//! Lifecycle events as [`tracing`] spans.
//!
//! [`TracingListener`] is a [`LifecycleListener`] that reports every
//! published event. Register it with a transaction manager like any other
//! listener; it sees events only once their transaction commits.
//!
//! # Usage
//!
//! ```no_run
//! use interlock_trace::{TraceConfig, TracingListener};
//!
//! let listener = TracingListener::new(TraceConfig {
//!     capture_values: false,
//! });
//! // TransactionManager::new().with_listener(Arc::new(listener))
//! ```
//!
//! # Spans
//!
//! | Span name | Fields | When |
//! |-----------|--------|------|
//! | `lifecycle.event` | `event`, `target_object`, `user`, `transaction`, `sequence` | Each published event |
//!
//! Inside the span one `info` event describes what happened. Property
//! values and action arguments can be personal data and are left out
//! unless `capture_values` is set.

use interlock_core::error::ListenerError;
use interlock_core::lifecycle::{EventKind, LifecycleEvent, LifecycleListener};
use serde::{Deserialize, Serialize};

/// Configuration for the tracing listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Whether to include property values, action arguments and results.
    /// Off by default.
    pub capture_values: bool,
}

/// A [`LifecycleListener`] that emits one `lifecycle.event` span per
/// published event. Never refuses a batch.
pub struct TracingListener {
    config: TraceConfig,
}

impl TracingListener {
    /// Create a listener with the given configuration.
    #[must_use]
    pub fn new(config: TraceConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }
}

impl Default for TracingListener {
    fn default() -> Self {
        Self::new(TraceConfig::default())
    }
}

impl LifecycleListener for TracingListener {
    fn prepare(&self, batch: &[LifecycleEvent]) -> Result<(), ListenerError> {
        tracing::debug!(events = batch.len(), "lifecycle batch prepared");
        Ok(())
    }

    fn publish(&self, event: &LifecycleEvent) {
        let span = tracing::info_span!(
            "lifecycle.event",
            event = event.kind.label(),
            target_object = %event.target,
            user = %event.user,
            transaction = event.transaction.as_ref().map_or("-", |tx| tx.as_str()),
            sequence = event.sequence,
        );
        span.in_scope(|| match &event.kind {
            EventKind::PropertyChanged {
                property,
                before,
                after,
            } => {
                if self.config.capture_values {
                    tracing::info!(property = %property, before = %before, after = %after, "property changed");
                } else {
                    tracing::info!(property = %property, "property changed");
                }
            }
            EventKind::ActionInvoked {
                action,
                arguments,
                result,
            } => {
                if self.config.capture_values {
                    tracing::info!(
                        action = %action,
                        arguments = ?arguments,
                        result = %result,
                        "action invoked"
                    );
                } else {
                    tracing::info!(action = %action, arguments = arguments.len(), "action invoked");
                }
            }
            other => {
                tracing::info!("object {}", other.label());
            }
        });
    }
}
