//! Typed ID wrappers for object types, object ids, users and transactions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed ID wrappers keep a user id from being passed where an object type
/// is expected. They are plain strings underneath; the framework imposes no
/// format.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new typed ID from anything that converts to String.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

typed_id!(TypeName, "Logical name of a domain type, e.g. `Book`.");
typed_id!(ObjectId, "Identifier of one instance within its type.");
typed_id!(UserId, "The acting user an interaction runs on behalf of.");
typed_id!(TransactionId, "Identifier of one transaction.");
