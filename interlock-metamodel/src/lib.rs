#![deny(missing_docs)]
//! In-memory implementation of interlock-core's Metamodel trait.
//!
//! Member specifications are registered up front, keyed by
//! `(type, member name)`, and handed out as shared `Arc<MemberSpec>`s.
//! Per-member rules are attached alongside. Lookups never reflect on the
//! domain type; a member the registry was not told about does not exist.

use interlock_core::error::MetamodelError;
use interlock_core::id::TypeName;
use interlock_core::member::MemberSpec;
use interlock_core::metamodel::Metamodel;
use interlock_core::rule::Rule;
use std::collections::HashMap;
use std::sync::Arc;

struct Entry {
    spec: Arc<MemberSpec>,
    rules: Vec<Arc<dyn Rule>>,
}

/// A registry of member specifications.
///
/// Built once at startup and shared read-only afterwards, so it needs no
/// interior locking.
pub struct MetamodelRegistry {
    members: HashMap<(TypeName, String), Entry>,
}

impl MetamodelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            members: HashMap::new(),
        }
    }

    /// Register one member under its owning type.
    pub fn register(&mut self, spec: MemberSpec) -> Result<(), MetamodelError> {
        let key = (spec.owner.clone(), spec.name.clone());
        if self.members.contains_key(&key) {
            return Err(MetamodelError::DuplicateMember(spec.identifier()));
        }
        tracing::trace!(member = %spec.identifier(), kind = ?spec.kind, "member registered");
        self.members.insert(
            key,
            Entry {
                spec: Arc::new(spec),
                rules: Vec::new(),
            },
        );
        Ok(())
    }

    /// Register every member of one type. Each spec must be owned by
    /// `object_type`.
    pub fn register_type(
        &mut self,
        object_type: impl Into<TypeName>,
        members: impl IntoIterator<Item = MemberSpec>,
    ) -> Result<(), MetamodelError> {
        let object_type = object_type.into();
        for spec in members {
            if spec.owner != object_type {
                return Err(MetamodelError::ForeignMember {
                    member: spec.identifier(),
                    object_type: object_type.to_string(),
                });
            }
            self.register(spec)?;
        }
        Ok(())
    }

    /// Attach a rule to a registered member. Rules run in attachment order.
    pub fn attach_rule(
        &mut self,
        object_type: impl Into<TypeName>,
        member: &str,
        rule: Arc<dyn Rule>,
    ) -> Result<(), MetamodelError> {
        let object_type = object_type.into();
        let entry = self
            .members
            .get_mut(&(object_type.clone(), member.to_owned()))
            .ok_or_else(|| MetamodelError::UnknownMember(format!("{object_type}#{member}")))?;
        entry.rules.push(rule);
        Ok(())
    }

    /// Members registered for `object_type`, in no particular order.
    pub fn members_of(&self, object_type: &TypeName) -> Vec<Arc<MemberSpec>> {
        self.members
            .iter()
            .filter(|((ty, _), _)| ty == object_type)
            .map(|(_, entry)| Arc::clone(&entry.spec))
            .collect()
    }

    /// Total number of registered members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Default for MetamodelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Metamodel for MetamodelRegistry {
    fn resolve_member(&self, object_type: &TypeName, name: &str) -> Option<Arc<MemberSpec>> {
        self.members
            .get(&(object_type.clone(), name.to_owned()))
            .map(|entry| Arc::clone(&entry.spec))
    }

    fn rules(&self, member: &MemberSpec) -> Vec<Arc<dyn Rule>> {
        self.members
            .get(&(member.owner.clone(), member.name.clone()))
            .map(|entry| entry.rules.clone())
            .unwrap_or_default()
    }
}
