//! Field descriptors and raw field access.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::model::Value;
use crate::tags::Tag;
use crate::types::TypeDescriptor;

/// Failure of a raw field read or write. Never retried, never wrapped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("field is not readable")]
    NotReadable,

    #[error("field is not writable")]
    NotWritable,

    /// `found` is the `TypeId` of the value that was passed in.
    #[error("target is not a {expected} (found {found:?})")]
    TypeMismatch { expected: &'static str, found: TypeId },

    #[error("invalid value: expected {expected}, got {got}")]
    InvalidValue { expected: String, got: String },
}

/// Raw get/set capability for one field of a mapped type.
pub trait FieldAccessor: Send + Sync {
    fn get(&self, target: &dyn Any) -> Result<Value, AccessError>;
    fn set(&self, target: &mut dyn Any, value: Value) -> Result<(), AccessError>;
}

/// `FieldAccessor` over a concrete type, from a getter and an optional setter.
///
/// A missing setter makes the field read-only: `set` fails with
/// `AccessError::NotWritable`.
pub struct TypedAccessor<T> {
    getter: fn(&T) -> Value,
    setter: Option<fn(&mut T, Value) -> Result<(), AccessError>>,
}

impl<T: 'static> TypedAccessor<T> {
    pub fn new(getter: fn(&T) -> Value, setter: fn(&mut T, Value) -> Result<(), AccessError>) -> Self {
        Self { getter, setter: Some(setter) }
    }

    pub fn read_only(getter: fn(&T) -> Value) -> Self {
        Self { getter, setter: None }
    }
}

impl<T: 'static> FieldAccessor for TypedAccessor<T> {
    fn get(&self, target: &dyn Any) -> Result<Value, AccessError> {
        let found = (*target).type_id();
        let target = target
            .downcast_ref::<T>()
            .ok_or(AccessError::TypeMismatch { expected: std::any::type_name::<T>(), found })?;
        Ok((self.getter)(target))
    }

    fn set(&self, target: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        let setter = self.setter.ok_or(AccessError::NotWritable)?;
        let found = (*target).type_id();
        let target = target
            .downcast_mut::<T>()
            .ok_or(AccessError::TypeMismatch { expected: std::any::type_name::<T>(), found })?;
        setter(target, value)
    }
}

/// One field of a mapped type, supplied once at metadata-build time.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub declared_type: TypeDescriptor,
    pub tags: SmallVec<[Tag; 4]>,
    pub accessor: Option<Arc<dyn FieldAccessor>>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, declared_type: impl Into<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            tags: SmallVec::new(),
            accessor: None,
        }
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn with_accessor(mut self, accessor: impl FieldAccessor + 'static) -> Self {
        self.accessor = Some(Arc::new(accessor));
        self
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("tags", &self.tags)
            .field("accessor", &self.accessor.is_some())
            .finish()
    }
}
