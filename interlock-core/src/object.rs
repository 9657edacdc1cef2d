//! The Object protocol: name-based access to one domain instance.

use crate::error::ObjectError;
use crate::id::{ObjectId, TypeName};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};

/// A domain instance shared between its owner and the interaction layer.
pub type Shared<T> = Arc<Mutex<T>>;

/// Stable address of a domain instance: its type plus its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bookmark {
    /// The instance's type.
    pub object_type: TypeName,
    /// The instance's id within that type.
    pub id: ObjectId,
}

impl Bookmark {
    /// Create a bookmark.
    pub fn new(object_type: impl Into<TypeName>, id: impl Into<ObjectId>) -> Self {
        Self {
            object_type: object_type.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.id)
    }
}

/// Protocol ① — Object
///
/// The mediated operations of a domain type. Implementations map member
/// names onto their own fields and methods; they perform no rule checks of
/// their own. All rule enforcement and event recording happens in the
/// interaction layer before and after these calls.
pub trait DomainObject: Send + 'static {
    /// Where this instance lives.
    fn bookmark(&self) -> Bookmark;

    /// Read a property.
    fn get(&self, property: &str) -> Result<Value, ObjectError>;

    /// Write a property.
    fn set(&mut self, property: &str, value: Value) -> Result<(), ObjectError>;

    /// Invoke an action with positional arguments.
    fn invoke(&mut self, action: &str, args: &[Value]) -> Result<Value, ObjectError>;
}

/// Shared handle to a domain instance plus its bookmark.
///
/// Cloning the handle clones the reference, not the instance.
#[derive(Clone)]
pub struct ObjectHandle {
    object: Arc<Mutex<dyn DomainObject>>,
    bookmark: Bookmark,
}

impl ObjectHandle {
    /// Take ownership of `object` and share it.
    pub fn new<T: DomainObject>(object: T) -> Self {
        let bookmark = object.bookmark();
        Self {
            object: Arc::new(Mutex::new(object)),
            bookmark,
        }
    }

    /// Adopt an instance the caller already shares.
    pub fn from_shared<T: DomainObject>(shared: &Shared<T>) -> Result<Self, ObjectError> {
        let bookmark = shared
            .lock()
            .map_err(|_| ObjectError::Poisoned)?
            .bookmark();
        let object: Arc<Mutex<dyn DomainObject>> = shared.clone();
        Ok(Self { object, bookmark })
    }

    /// The instance's bookmark, captured when the handle was made.
    pub fn bookmark(&self) -> &Bookmark {
        &self.bookmark
    }

    /// The instance's type.
    pub fn object_type(&self) -> &TypeName {
        &self.bookmark.object_type
    }

    /// Run `f` with shared access to the instance.
    pub fn read<R>(&self, f: impl FnOnce(&dyn DomainObject) -> R) -> Result<R, ObjectError> {
        let guard = self.object.lock().map_err(|_| ObjectError::Poisoned)?;
        Ok(f(&*guard))
    }

    /// Run `f` with exclusive access to the instance.
    pub fn write<R>(&self, f: impl FnOnce(&mut dyn DomainObject) -> R) -> Result<R, ObjectError> {
        let mut guard = self.object.lock().map_err(|_| ObjectError::Poisoned)?;
        Ok(f(&mut *guard))
    }

    /// Whether both handles point at the same instance.
    pub fn same_instance(&self, other: &ObjectHandle) -> bool {
        Arc::ptr_eq(&self.object, &other.object)
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("bookmark", &self.bookmark)
            .finish_non_exhaustive()
    }
}
