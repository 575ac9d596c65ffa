//! # neo4j-ogm — Object-Graph Mapping Metadata
//!
//! Decides, for every field of every mapped type, what role it plays when
//! objects are written to and read from a property graph: identity,
//! relationship (simple or via a relationship entity), indexed field, or
//! plain property, and whether a plain property is stored natively or
//! through a string conversion.
//!
//! ## Design Principles
//!
//! 1. **Compute once**: classification happens when an entity is registered; queries are plain reads
//! 2. **Explicit beats inferred**: relationship tags always override structural inference
//! 3. **Snapshots, not mutation**: rebuilding a type publishes a new immutable snapshot
//! 4. **Arena back-references**: properties know their owner by `EntityId`, never by pointer
//!
//! ## Quick Start
//!
//! ```rust
//! use neo4j_ogm::{
//!     ClassType, Direction, FieldDescriptor, MappingContext, Primitive, Tag, TypeDescriptor,
//! };
//!
//! # fn example() -> neo4j_ogm::Result<()> {
//! let ctx = MappingContext::default();
//! let person = ClassType::node_entity("app.Person");
//!
//! let entity = ctx.register(person.clone(), [
//!     FieldDescriptor::new("id", TypeDescriptor::Wrapper(Primitive::I64)).with_tag(Tag::GraphId),
//!     FieldDescriptor::new("name", TypeDescriptor::String),
//!     FieldDescriptor::new("friends", TypeDescriptor::collection_of(person.into()))
//!         .with_tag(Tag::related_to("KNOWS", Direction::Both)),
//! ])?;
//!
//! assert_eq!(entity.id_property().map(|p| p.name()), Some("id"));
//! assert!(entity.property("friends").unwrap().is_relationship());
//! assert!(entity.property("name").unwrap().is_native_property_type());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod convert;
pub mod index;
pub mod mapping;
pub mod model;
pub mod tags;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::MappingConfig;
pub use convert::{ConversionService, DefaultConversionService};
pub use index::{IndexInfo, IndexLevel, IndexType};
pub use mapping::{
    AccessError, EntityId, FieldAccessor, FieldDescriptor, MappingContext, MappingSnapshot,
    OwnerMetadata, PersistentEntity, PersistentProperty, PropertyKind, RelationshipInfo,
    TypedAccessor,
};
pub use model::{Direction, EntityRef, NodeId, Value};
pub use tags::{Tag, TagKind, TagLookup};
pub use types::{ClassType, Primitive, Stereotype, TemporalKind, TypeDescriptor};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Entity {entity} declares more than one identity field: {first}, {second}")]
    DuplicateIdentity { entity: String, first: String, second: String },

    #[error("Identity field {entity}.{field} also declares a relationship")]
    IdentityRelationshipConflict { entity: String, field: String },

    #[error("Field {entity}.{field} declares both RelatedTo and RelatedToVia")]
    ConflictingRelationship { entity: String, field: String },

    #[error("Entity {entity} declares field {field} twice")]
    DuplicateProperty { entity: String, field: String },

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Field access error: {0}")]
    Access(#[from] AccessError),

    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
