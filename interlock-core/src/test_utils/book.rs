//! Book: the fixture domain type.

use crate::context::ExecutionContext;
use crate::error::ObjectError;
use crate::member::{MemberSpec, ParamSpec, Where};
use crate::object::{Bookmark, DomainObject, Shared};
use crate::value::{Value, ValueType};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Type name of [`Book`].
pub const BOOK: &str = "Book";

/// A book with a name, an author, a price and a reviewer.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    /// Instance id.
    pub id: String,
    /// Title.
    pub name: String,
    /// Author.
    pub author: String,
    /// Price.
    pub price: f64,
    /// Optional blurb.
    pub description: Option<String>,
    /// User who last ran `stampReviewer`.
    pub reviewed_by: Option<String>,
    /// Hidden everywhere.
    pub internal_code: String,
    /// Time every action takes, to simulate slow domain logic.
    pub latency: Duration,
}

impl Book {
    /// The book most tests start from.
    pub fn sample() -> Self {
        Self {
            id: "1".into(),
            name: "Sample Book".into(),
            author: "J.R.R. Tolkien".into(),
            price: 99.0,
            description: None,
            reviewed_by: None,
            internal_code: "INT-001".into(),
            latency: Duration::ZERO,
        }
    }

    /// Make every action sleep for `latency` first.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Wrap for sharing with the interaction layer.
    pub fn shared(self) -> Shared<Book> {
        Arc::new(Mutex::new(self))
    }

    fn string(member: &str, value: Value) -> Result<String, ObjectError> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(ObjectError::TypeMismatch {
                member: member.into(),
                expected: "string".into(),
            }),
        }
    }

    fn optional_string(member: &str, value: Value) -> Result<Option<String>, ObjectError> {
        match value {
            Value::Null => Ok(None),
            other => Self::string(member, other).map(Some),
        }
    }

    fn number(member: &str, value: &Value) -> Result<f64, ObjectError> {
        value.as_f64().ok_or_else(|| ObjectError::TypeMismatch {
            member: member.into(),
            expected: "number".into(),
        })
    }
}

impl DomainObject for Book {
    fn bookmark(&self) -> Bookmark {
        Bookmark::new(BOOK, self.id.as_str())
    }

    fn get(&self, property: &str) -> Result<Value, ObjectError> {
        match property {
            "name" => Ok(json!(self.name)),
            "author" => Ok(json!(self.author)),
            "price" => Ok(json!(self.price)),
            "description" => Ok(json!(self.description)),
            "reviewedBy" => Ok(json!(self.reviewed_by)),
            "internalCode" => Ok(json!(self.internal_code)),
            other => Err(ObjectError::NoSuchProperty(other.into())),
        }
    }

    fn set(&mut self, property: &str, value: Value) -> Result<(), ObjectError> {
        match property {
            "name" => self.name = Self::string(property, value)?,
            "author" => self.author = Self::string(property, value)?,
            "price" => self.price = Self::number(property, &value)?,
            "description" => self.description = Self::optional_string(property, value)?,
            "reviewedBy" => self.reviewed_by = Self::optional_string(property, value)?,
            "internalCode" => self.internal_code = Self::string(property, value)?,
            other => return Err(ObjectError::NoSuchProperty(other.into())),
        }
        Ok(())
    }

    fn invoke(&mut self, action: &str, args: &[Value]) -> Result<Value, ObjectError> {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        match action {
            "doubleThePrice" => {
                self.price *= 2.0;
                Ok(json!(self.price))
            }
            "applyDiscount" => {
                let percent = args
                    .first()
                    .ok_or_else(|| ObjectError::Failed("missing percent".into()))
                    .and_then(|v| Self::number(action, v))?;
                self.price *= 1.0 - percent / 100.0;
                Ok(json!(self.price))
            }
            "stampReviewer" => {
                let user = ExecutionContext::current()
                    .map(|ctx| ctx.user().to_string())
                    .ok_or_else(|| ObjectError::Failed("no execution context".into()))?;
                self.reviewed_by = Some(user.clone());
                Ok(json!(user))
            }
            other => Err(ObjectError::NoSuchAction(other.into())),
        }
    }
}

/// Member catalogue of [`Book`].
///
/// `reviewedBy` is always disabled, `internalCode` hidden everywhere,
/// `description` optional. Everything else is open.
pub fn book_members() -> Vec<MemberSpec> {
    vec![
        MemberSpec::property(BOOK, "name", ValueType::String),
        MemberSpec::property(BOOK, "author", ValueType::String),
        MemberSpec::property(BOOK, "price", ValueType::Number),
        MemberSpec::property(BOOK, "description", ValueType::String).optional(),
        MemberSpec::property(BOOK, "reviewedBy", ValueType::String)
            .optional()
            .disabled("Set by the stampReviewer action"),
        MemberSpec::property(BOOK, "internalCode", ValueType::String).hidden_in(Where::Everywhere),
        MemberSpec::action(BOOK, "doubleThePrice", ValueType::Number),
        MemberSpec::action(BOOK, "applyDiscount", ValueType::Number)
            .with_parameter(ParamSpec::new("percent", ValueType::Number)),
        MemberSpec::action(BOOK, "stampReviewer", ValueType::String),
    ]
}

/// Like [`book_members`], but `name` and `doubleThePrice` are always
/// disabled, as in a domain whose books are locked for editing.
pub fn locked_book_members() -> Vec<MemberSpec> {
    book_members()
        .into_iter()
        .map(|spec| match spec.name.as_str() {
            "name" | "doubleThePrice" => spec.disabled("Locked for publishing"),
            _ => spec,
        })
        .collect()
}
