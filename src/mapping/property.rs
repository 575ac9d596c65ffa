//! Per-field classification.
//!
//! A `PersistentProperty` is built once, when its owning entity is built,
//! and never changes afterwards. Every query below is a plain read of state
//! computed in `PersistentProperty::new`.
//!
//! Relationship resolution, first match wins:
//!
//! ```text
//! RelatedTo tag              → explicit relationship
//! RelatedToVia tag           → explicit relationship through a relationship entity
//! node owner + node element  → inferred relationship (default direction, no label)
//! otherwise                  → not a relationship
//! ```

use std::any::Any;
use std::fmt;

use crate::config::MappingConfig;
use crate::convert::ConversionService;
use crate::index::IndexInfo;
use crate::model::Value;
use crate::tags::{Tag, TagKind, TagLookup};
use crate::types::TypeDescriptor;

use super::entity::{EntityId, OwnerMetadata};
use super::field::{AccessError, FieldDescriptor};
use super::relationship::RelationshipInfo;

/// The role a field plays in the mapping. Decided once at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    /// Holds the graph-assigned identity.
    Identity,
    /// References other entities through graph relationships.
    Relationship(RelationshipInfo),
    /// Stored as a graph property, natively or through string conversion.
    SimpleValue,
    /// Neither of the above, e.g. a collection of plain values.
    Unclassified,
}

/// Classified metadata for one field of a mapped entity.
#[derive(Debug, Clone)]
pub struct PersistentProperty {
    field: FieldDescriptor,
    owner: EntityId,
    tags: TagLookup,
    kind: PropertyKind,
    relationship: Option<RelationshipInfo>,
    index: Option<IndexInfo>,
    simple_value: bool,
    native: bool,
    synthetic: bool,
    transient: bool,
    qualified_name: String,
}

impl PersistentProperty {
    pub fn new(field: FieldDescriptor, owner: &dyn OwnerMetadata, config: &MappingConfig) -> Self {
        let tags = TagLookup::extract(&field.tags);
        let declared = &field.declared_type;

        let identity = tags.has_tag(TagKind::GraphId);
        let relationship = resolve_relationship(declared, &tags, owner);
        let simple_value = is_simple_value(declared);
        let kind = if identity {
            PropertyKind::Identity
        } else if let Some(info) = &relationship {
            PropertyKind::Relationship(info.clone())
        } else if simple_value {
            PropertyKind::SimpleValue
        } else {
            PropertyKind::Unclassified
        };

        let index = match tags.get_tag(TagKind::Indexed) {
            Some(Tag::Indexed { index_name, fulltext, field_name, level }) => {
                Some(IndexInfo::new(index_name.as_str(), *fulltext, field_name.as_str(), *level, &field.name))
            }
            _ => None,
        };

        let qualified_name = if owner.use_short_property_names() {
            field.name.clone()
        } else {
            format!("{}.{}", owner.simple_type_name(), field.name)
        };

        let property = Self {
            native: is_native_property_type(declared),
            synthetic: field.name.contains(config.synthetic_marker),
            transient: tags.has_tag(TagKind::Transient),
            owner: owner.entity_id(),
            field,
            tags,
            kind,
            relationship,
            index,
            simple_value,
            qualified_name,
        };
        tracing::debug!(property = %property, kind = ?property.kind_name(), "classified field");
        property
    }

    // ========================================================================
    // Identity + naming
    // ========================================================================

    pub fn name(&self) -> &str {
        &self.field.name
    }

    pub fn declared_type(&self) -> &TypeDescriptor {
        &self.field.declared_type
    }

    pub fn field(&self) -> &FieldDescriptor {
        &self.field
    }

    pub fn tags(&self) -> &TagLookup {
        &self.tags
    }

    /// Handle of the owning entity; resolve through `MappingContext::owner_of`.
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    pub fn is_identity(&self) -> bool {
        self.kind == PropertyKind::Identity
    }

    /// Property key in the graph: the bare field name, or
    /// `<OwnerSimpleName>.<field>` when the owner uses qualified names.
    pub fn qualified_property_name(&self) -> &str {
        &self.qualified_name
    }

    // ========================================================================
    // Relationships + indexes
    // ========================================================================

    /// Resolved independently of identity: an identity field that also
    /// declares a relationship still reports it here.
    pub fn relationship_info(&self) -> Option<&RelationshipInfo> {
        self.relationship.as_ref()
    }

    pub fn is_relationship(&self) -> bool {
        self.relationship_info().is_some()
    }

    /// Carries a `RelatedTo` or `RelatedToVia` tag, whatever the final kind.
    pub fn has_explicit_relationship(&self) -> bool {
        self.tags.has_tag(TagKind::RelatedTo) || self.tags.has_tag(TagKind::RelatedToVia)
    }

    pub fn index_info(&self) -> Option<&IndexInfo> {
        self.index.as_ref()
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    // ========================================================================
    // Value facets
    // ========================================================================

    /// Not a collection and not node- or relationship-backed.
    pub fn is_simple_value(&self) -> bool {
        self.simple_value
    }

    pub fn is_serializable(&self, conversion: &dyn ConversionService) -> bool {
        self.simple_value && conversion.can_convert(&self.field.declared_type, &TypeDescriptor::String)
    }

    pub fn is_deserializable(&self, conversion: &dyn ConversionService) -> bool {
        self.simple_value && conversion.can_convert(&TypeDescriptor::String, &self.field.declared_type)
    }

    pub fn is_native_property_type(&self) -> bool {
        self.native
    }

    /// Compiler-generated field; never mapped.
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn is_transient(&self) -> bool {
        self.transient
    }

    // ========================================================================
    // Raw access
    // ========================================================================

    pub fn get_value(&self, entity: &dyn Any) -> Result<Value, AccessError> {
        match &self.field.accessor {
            Some(accessor) => accessor.get(entity),
            None => Err(AccessError::NotReadable),
        }
    }

    pub fn set_value(&self, entity: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        match &self.field.accessor {
            Some(accessor) => accessor.set(entity, value),
            None => Err(AccessError::NotWritable),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self.kind {
            PropertyKind::Identity => "identity",
            PropertyKind::Relationship(_) => "relationship",
            PropertyKind::SimpleValue => "simple",
            PropertyKind::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for PersistentProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} rel: {} idx: {}",
            self.field.declared_type,
            self.field.name,
            self.is_relationship(),
            self.is_indexed()
        )
    }
}

// ============================================================================
// Rules
// ============================================================================

fn resolve_relationship(
    declared: &TypeDescriptor,
    tags: &TagLookup,
    owner: &dyn OwnerMetadata,
) -> Option<RelationshipInfo> {
    if let Some(Tag::RelatedTo { rel_type, direction, element_class }) = tags.get_tag(TagKind::RelatedTo) {
        return Some(RelationshipInfo::from_related_to(declared, rel_type, *direction, element_class.as_ref()));
    }
    if let Some(Tag::RelatedToVia { rel_type, direction, element_class }) = tags.get_tag(TagKind::RelatedToVia) {
        return Some(RelationshipInfo::from_related_to_via(declared, rel_type, *direction, element_class.as_ref()));
    }
    if tags.has_tag(TagKind::Transient) {
        return None;
    }
    let element_is_node = declared.element_type().is_node_entity() || tags.has_tag(TagKind::NodeEntity);
    if owner.is_node_entity() && element_is_node {
        return Some(RelationshipInfo::inferred(declared));
    }
    None
}

/// Collections and node-/relationship-backed types are never simple values,
/// even when a converter exists for their element type.
pub fn is_simple_value(declared: &TypeDescriptor) -> bool {
    !(declared.is_collection() || declared.is_node_backed() || declared.is_relationship_backed())
}

/// Directly storable as a graph property: primitives, wrappers, strings,
/// and single-level arrays of those. Arrays of arrays are not native.
pub fn is_native_property_type(declared: &TypeDescriptor) -> bool {
    match declared {
        TypeDescriptor::Primitive(_) | TypeDescriptor::Wrapper(_) | TypeDescriptor::String => true,
        TypeDescriptor::Array(component) => !component.is_array() && is_native_property_type(component),
        _ => false,
    }
}
