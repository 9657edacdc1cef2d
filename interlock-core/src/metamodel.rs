//! The Metamodel protocol: resolving member names to specifications.

use crate::id::TypeName;
use crate::member::MemberSpec;
use crate::rule::Rule;
use std::sync::Arc;

/// Protocol ② — Metamodel
///
/// Maps `(type, member name)` to an immutable [`MemberSpec`], resolved once
/// per interaction. `None` means the member does not exist; the
/// interaction layer reports that exactly as it reports a hidden member.
///
/// A metamodel may also attach rules to individual members. These run
/// after the built-in facet rules and before rules registered globally on
/// the evaluator.
pub trait Metamodel: Send + Sync {
    /// Look up a member.
    fn resolve_member(&self, object_type: &TypeName, name: &str) -> Option<Arc<MemberSpec>>;

    /// Rules specific to `member`. Defaults to none.
    fn rules(&self, _member: &MemberSpec) -> Vec<Arc<dyn Rule>> {
        Vec::new()
    }
}
