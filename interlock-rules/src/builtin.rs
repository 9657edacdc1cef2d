//! Facet rules: the decisions a [`MemberSpec`] already declares.

use interlock_core::member::{MemberSpec, ParamSpec};
use interlock_core::rule::{Candidate, Consent, Rule, RuleContext, RulePhase};
use interlock_core::value::{Value, ValueType};

/// Hides a member at the places named by its `hidden_where` facet.
pub struct HiddenWhereRule;

impl Rule for HiddenWhereRule {
    fn phases(&self) -> &[RulePhase] {
        &[RulePhase::Visibility]
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Consent {
        if ctx.member.hidden_where.includes(ctx.place) {
            Consent::veto("Hidden")
        } else {
            Consent::Allow
        }
    }
}

/// Disables a member whose spec carries a disabled reason.
pub struct DisabledFacetRule;

impl Rule for DisabledFacetRule {
    fn phases(&self) -> &[RulePhase] {
        &[RulePhase::Usability]
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Consent {
        match &ctx.member.disabled_reason {
            Some(reason) => Consent::veto(reason.clone()),
            None => Consent::Allow,
        }
    }
}

/// Checks a candidate against declared types, mandatory-ness and, for
/// actions, the number of arguments.
pub struct ElementTypeRule;

impl ElementTypeRule {
    fn check_value(
        label: &str,
        value_type: &ValueType,
        optional: bool,
        value: &Value,
    ) -> Consent {
        if value.is_null() {
            return if optional {
                Consent::Allow
            } else {
                Consent::veto(format!("'{label}' is mandatory"))
            };
        }
        if value_type.accepts(value) {
            Consent::Allow
        } else {
            Consent::veto(format!("'{label}' expects {value_type}"))
        }
    }

    fn check_arguments(member: &MemberSpec, args: &[Value]) -> Consent {
        let params: &[ParamSpec] = &member.parameters;
        if args.len() != params.len() {
            return Consent::veto(format!(
                "expected {} argument(s), got {}",
                params.len(),
                args.len()
            ));
        }
        params
            .iter()
            .zip(args)
            .map(|(param, arg)| Self::check_value(&param.name, &param.value_type, param.optional, arg))
            .find(|consent| !consent.is_allowed())
            .unwrap_or(Consent::Allow)
    }
}

impl Rule for ElementTypeRule {
    fn phases(&self) -> &[RulePhase] {
        &[RulePhase::Validity]
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Consent {
        let member = ctx.member;
        match ctx.candidate {
            None => Consent::Allow,
            Some(Candidate::Value(value)) if member.is_property() => {
                Self::check_value(&member.name, &member.element_type, member.optional, value)
            }
            Some(Candidate::Arguments(args)) if member.is_action() => {
                Self::check_arguments(member, args)
            }
            Some(_) => Consent::veto(format!("'{}' cannot take this kind of candidate", member.name)),
        }
    }
}
