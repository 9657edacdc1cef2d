//! Member values and their declared types.
//!
//! Values cross the interaction boundary as [`serde_json::Value`]. Domain
//! objects convert to and from their own field types; the framework only
//! needs to compare, snapshot and type-check them.

use crate::id::TypeName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A property value, action argument or action result.
pub type Value = serde_json::Value;

/// The declared type of a property, parameter or action result.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum ValueType {
    /// A string.
    String,
    /// A whole number.
    Integer,
    /// Any JSON number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// A reference to another domain object, carried as its bookmark string.
    Reference(TypeName),
    /// Actions that return nothing.
    Void,
    /// Unchecked.
    Any,
}

impl ValueType {
    /// Whether a non-null `value` conforms to this type.
    ///
    /// Null handling is the business of the mandatory check, so `Null` is
    /// only accepted by [`ValueType::Void`] and [`ValueType::Any`].
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ValueType::String | ValueType::Reference(_) => value.is_string(),
            ValueType::Integer => value.is_i64() || value.is_u64(),
            ValueType::Number => value.is_number(),
            ValueType::Boolean => value.is_boolean(),
            ValueType::Void => value.is_null(),
            ValueType::Any => true,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::String => f.write_str("string"),
            ValueType::Integer => f.write_str("integer"),
            ValueType::Number => f.write_str("number"),
            ValueType::Boolean => f.write_str("boolean"),
            ValueType::Reference(ty) => write!(f, "reference to {ty}"),
            ValueType::Void => f.write_str("void"),
            ValueType::Any => f.write_str("any"),
        }
    }
}
