//! Owning-entity metadata.
//!
//! A `PersistentEntity` owns the classified properties of one mapped type.
//! Properties point back at their owner by `EntityId` only; the handle is
//! resolved through the `MappingContext` arena.

use std::any::Any;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::config::MappingConfig;
use crate::model::Value;
use crate::tags::TagKind;
use crate::types::ClassType;
use crate::{Error, Result};

use super::field::FieldDescriptor;
use super::property::{PersistentProperty, PropertyKind};

/// Arena handle of a `PersistentEntity` within a `MappingContext`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a property needs to know about the entity that declares it.
pub trait OwnerMetadata {
    fn entity_id(&self) -> EntityId;
    fn is_node_entity(&self) -> bool;
    fn use_short_property_names(&self) -> bool;
    fn simple_type_name(&self) -> &str;
}

/// Owner view used while the entity's properties are being classified.
struct OwnerView<'a> {
    id: EntityId,
    class: &'a ClassType,
    short_names: bool,
}

impl OwnerMetadata for OwnerView<'_> {
    fn entity_id(&self) -> EntityId { self.id }
    fn is_node_entity(&self) -> bool { self.class.is_node_entity() }
    fn use_short_property_names(&self) -> bool { self.short_names }
    fn simple_type_name(&self) -> &str { self.class.simple_name() }
}

/// Metadata for one mapped type and all of its classified fields.
#[derive(Debug, Clone)]
pub struct PersistentEntity {
    id: EntityId,
    class: ClassType,
    short_names: bool,
    properties: Vec<PersistentProperty>,
    by_name: HashMap<String, usize>,
    id_property: Option<usize>,
}

impl PersistentEntity {
    /// Classify every field and check the cross-field rules.
    ///
    /// # Errors
    ///
    /// - `DuplicateProperty` when two fields share a name.
    /// - `ConflictingRelationship` when a field carries both `RelatedTo` and `RelatedToVia`.
    /// - `IdentityRelationshipConflict` when the identity field also declares a relationship.
    /// - `DuplicateIdentity` when more than one field is the identity.
    pub fn build(
        id: EntityId,
        class: ClassType,
        fields: impl IntoIterator<Item = FieldDescriptor>,
        config: &MappingConfig,
    ) -> Result<Self> {
        let short_names = class.use_short_names.unwrap_or(config.use_short_property_names);
        let owner = OwnerView { id, class: &class, short_names };

        let mut properties: Vec<PersistentProperty> = Vec::new();
        let mut by_name = HashMap::new();
        let mut id_property: Option<usize> = None;

        for field in fields {
            let property = PersistentProperty::new(field, &owner, config);
            let name = property.name().to_string();

            if by_name.contains_key(&name) {
                return Err(Error::DuplicateProperty { entity: class.name.clone(), field: name });
            }
            if property.tags().has_tag(TagKind::RelatedTo)
                && property.tags().has_tag(TagKind::RelatedToVia)
            {
                return Err(Error::ConflictingRelationship { entity: class.name.clone(), field: name });
            }
            if property.is_identity() {
                if property.has_explicit_relationship() {
                    return Err(Error::IdentityRelationshipConflict { entity: class.name.clone(), field: name });
                }
                if let Some(first) = id_property {
                    return Err(Error::DuplicateIdentity {
                        entity: class.name.clone(),
                        first: properties[first].name().to_string(),
                        second: name,
                    });
                }
                id_property = Some(properties.len());
            }

            by_name.insert(name, properties.len());
            properties.push(property);
        }

        tracing::debug!(
            entity = %class.name,
            id = %id,
            properties = properties.len(),
            "built entity metadata"
        );

        Ok(Self { id, class, short_names, properties, by_name, id_property })
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn class(&self) -> &ClassType {
        &self.class
    }

    pub fn type_name(&self) -> &str {
        &self.class.name
    }

    pub fn id_property(&self) -> Option<&PersistentProperty> {
        self.id_property.map(|i| &self.properties[i])
    }

    pub fn property(&self, name: &str) -> Option<&PersistentProperty> {
        self.by_name.get(name).map(|&i| &self.properties[i])
    }

    /// Every field in declaration order, synthetic and transient included.
    pub fn properties(&self) -> &[PersistentProperty] {
        &self.properties
    }

    /// Fields the mapper reads and writes: neither synthetic nor transient.
    pub fn persistent_properties(&self) -> impl Iterator<Item = &PersistentProperty> {
        self.properties.iter().filter(|p| !p.is_synthetic() && !p.is_transient())
    }

    pub fn relationships(&self) -> impl Iterator<Item = &PersistentProperty> {
        self.persistent_properties().filter(|p| p.is_relationship())
    }

    pub fn indexed_properties(&self) -> impl Iterator<Item = &PersistentProperty> {
        self.persistent_properties().filter(|p| p.is_indexed())
    }

    /// Read every persistent simple-value field of `instance` that has raw
    /// access, keyed by qualified property name. The first access failure is
    /// returned as is.
    pub fn property_values(&self, instance: &dyn Any) -> Result<Vec<(&str, Value)>> {
        let mut values = Vec::new();
        for property in self.persistent_properties() {
            if property.kind() == &PropertyKind::SimpleValue && property.field().accessor.is_some() {
                values.push((property.qualified_property_name(), property.get_value(instance)?));
            }
        }
        Ok(values)
    }
}

impl OwnerMetadata for PersistentEntity {
    fn entity_id(&self) -> EntityId { self.id }
    fn is_node_entity(&self) -> bool { self.class.is_node_entity() }
    fn use_short_property_names(&self) -> bool { self.short_names }
    fn simple_type_name(&self) -> &str { self.class.simple_name() }
}
