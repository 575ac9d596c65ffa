//! # Mapping Metadata
//!
//! Field classification for object-graph mapping:
//!
//! ```text
//! FieldDescriptor → TagLookup → PersistentProperty → PersistentEntity → MappingContext
//! ```
//!
//! Everything here is computed once at registration time and is immutable
//! afterwards. Rebuilding a type publishes a new snapshot instead of
//! mutating the old one.

pub mod context;
pub mod entity;
pub mod field;
pub mod property;
pub mod relationship;

pub use context::{MappingContext, MappingSnapshot};
pub use entity::{EntityId, OwnerMetadata, PersistentEntity};
pub use field::{AccessError, FieldAccessor, FieldDescriptor, TypedAccessor};
pub use property::{PersistentProperty, PropertyKind, is_native_property_type, is_simple_value};
pub use relationship::RelationshipInfo;
