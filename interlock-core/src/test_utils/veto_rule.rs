//! VetoRule: objects to one phase, optionally for one member only.

use crate::rule::{Consent, Rule, RuleContext, RulePhase};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A rule that vetoes a single phase with a fixed reason, and counts how
/// often it was consulted.
pub struct VetoRule {
    phases: [RulePhase; 1],
    reason: String,
    member: Option<String>,
    checks: AtomicUsize,
}

impl VetoRule {
    /// Veto `phase` for every member.
    pub fn new(phase: RulePhase, reason: impl Into<String>) -> Self {
        Self {
            phases: [phase],
            reason: reason.into(),
            member: None,
            checks: AtomicUsize::new(0),
        }
    }

    /// Restrict the veto to the member called `name`.
    pub fn for_member(mut self, name: impl Into<String>) -> Self {
        self.member = Some(name.into());
        self
    }

    /// How many times `check` ran.
    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

impl Rule for VetoRule {
    fn phases(&self) -> &[RulePhase] {
        &self.phases
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Consent {
        self.checks.fetch_add(1, Ordering::SeqCst);
        match &self.member {
            Some(name) if *name != ctx.member.name => Consent::Allow,
            _ => Consent::veto(self.reason.clone()),
        }
    }
}
