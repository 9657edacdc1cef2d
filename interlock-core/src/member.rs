//! Member specifications: what the metamodel knows about a property or action.

use crate::id::TypeName;
use crate::value::ValueType;
use serde::{Deserialize, Serialize};

/// Where an interaction takes place. Rules may tailor their decision to it,
/// and [`MemberSpec::hidden_where`] names the places a member is hidden in.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Where {
    /// A form rendering a single object.
    #[default]
    ObjectForms,
    /// A table of objects owned by a parent object.
    ParentedTables,
    /// A table of objects returned by a query or action.
    StandaloneTables,
    /// Any table.
    AllTables,
    /// Every place an object is shown.
    Everywhere,
    /// Any place at all, including programmatic access.
    Anywhere,
    /// No place.
    Nowhere,
}

impl Where {
    /// Whether `self`, used as a hidden-where facet, covers `place`.
    pub fn includes(self, place: Where) -> bool {
        match self {
            Where::Nowhere => false,
            Where::Everywhere | Where::Anywhere => true,
            Where::AllTables => matches!(
                place,
                Where::AllTables | Where::ParentedTables | Where::StandaloneTables
            ),
            other => other == place,
        }
    }
}

/// Whether a member is a property or an action.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// A readable and possibly writable value.
    Property,
    /// An invokable operation.
    Action,
}

/// One parameter of an action.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    pub value_type: ValueType,
    /// Whether `null` is an acceptable argument.
    pub optional: bool,
}

impl ParamSpec {
    /// A mandatory parameter.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            optional: false,
        }
    }

    /// Mark the parameter optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Immutable description of a property or action on a domain type.
///
/// Besides identity and types, a spec carries the declarative facets the
/// built-in rules read: where the member is hidden, whether it is always
/// disabled, and whether a property may be cleared.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSpec {
    /// The type that declares the member.
    pub owner: TypeName,
    /// Member name, unique within its owner.
    pub name: String,
    /// Property or action.
    pub kind: MemberKind,
    /// Property type, or action return type.
    pub element_type: ValueType,
    /// Action parameters; empty for properties.
    pub parameters: Vec<ParamSpec>,
    /// Whether a property accepts `null`.
    pub optional: bool,
    /// Places the member is hidden in.
    pub hidden_where: Where,
    /// When set, the member is never usable and this is why.
    pub disabled_reason: Option<String>,
}

impl MemberSpec {
    /// Describe a mandatory property.
    pub fn property(
        owner: impl Into<TypeName>,
        name: impl Into<String>,
        element_type: ValueType,
    ) -> Self {
        Self::new(owner.into(), name.into(), MemberKind::Property, element_type)
    }

    /// Describe an action returning `returns`.
    pub fn action(owner: impl Into<TypeName>, name: impl Into<String>, returns: ValueType) -> Self {
        Self::new(owner.into(), name.into(), MemberKind::Action, returns)
    }

    fn new(owner: TypeName, name: String, kind: MemberKind, element_type: ValueType) -> Self {
        Self {
            owner,
            name,
            kind,
            element_type,
            parameters: Vec::new(),
            optional: false,
            hidden_where: Where::Nowhere,
            disabled_reason: None,
        }
    }

    /// Append an action parameter.
    pub fn with_parameter(mut self, param: ParamSpec) -> Self {
        self.parameters.push(param);
        self
    }

    /// Allow a property to be cleared.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Hide the member in `place`.
    pub fn hidden_in(mut self, place: Where) -> Self {
        self.hidden_where = place;
        self
    }

    /// Make the member permanently unusable.
    pub fn disabled(mut self, reason: impl Into<String>) -> Self {
        self.disabled_reason = Some(reason.into());
        self
    }

    /// `Owner#name`, used in errors and logs.
    pub fn identifier(&self) -> String {
        format!("{}#{}", self.owner, self.name)
    }

    /// Whether this is a property.
    pub fn is_property(&self) -> bool {
        self.kind == MemberKind::Property
    }

    /// Whether this is an action.
    pub fn is_action(&self) -> bool {
        self.kind == MemberKind::Action
    }
}
