//! Registry of entity metadata with snapshot publishing.
//!
//! ## Concurrency
//!
//! The current snapshot sits behind an `RwLock<Arc<_>>`. Readers clone the
//! `Arc` and never block a rebuild for longer than that clone. A rebuild
//! classifies the new entity under an upgradable read lock (so readers keep
//! going and writers are serialized), then upgrades and swaps the `Arc`.
//! A reader sees either the old snapshot or the new one, never a mix.

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};

use crate::config::MappingConfig;
use crate::types::ClassType;
use crate::{Error, Result};

use super::entity::{EntityId, PersistentEntity};
use super::field::FieldDescriptor;
use super::property::PersistentProperty;

/// Immutable view of every registered entity.
#[derive(Debug, Clone, Default)]
pub struct MappingSnapshot {
    /// Arena indexed by `EntityId`.
    entities: Vec<Arc<PersistentEntity>>,
    by_name: HashMap<String, EntityId>,
    generation: u64,
}

impl MappingSnapshot {
    pub fn entity(&self, type_name: &str) -> Option<&Arc<PersistentEntity>> {
        self.by_name.get(type_name).and_then(|id| self.entity_by_id(*id))
    }

    pub fn entity_by_id(&self, id: EntityId) -> Option<&Arc<PersistentEntity>> {
        self.entities.get(id.0 as usize)
    }

    pub fn owner_of(&self, property: &PersistentProperty) -> Option<&Arc<PersistentEntity>> {
        self.entity_by_id(property.owner())
    }

    pub fn entities(&self) -> impl Iterator<Item = &Arc<PersistentEntity>> {
        self.entities.iter()
    }

    /// Incremented on every publish.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Owns the metadata of every mapped type.
pub struct MappingContext {
    config: MappingConfig,
    current: RwLock<Arc<MappingSnapshot>>,
}

impl MappingContext {
    pub fn new(config: MappingConfig) -> Self {
        Self {
            config,
            current: RwLock::new(Arc::new(MappingSnapshot::default())),
        }
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Build metadata for `class` and publish it.
    ///
    /// Registering a type name that is already known rebuilds it in place in
    /// the arena, keeping its `EntityId`. On error nothing is published.
    pub fn register(
        &self,
        class: ClassType,
        fields: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Result<Arc<PersistentEntity>> {
        let guard = self.current.upgradable_read();
        let existing = guard.by_name.get(&class.name).copied();
        let id = existing.unwrap_or(EntityId(guard.entities.len() as u32));

        let entity = Arc::new(PersistentEntity::build(id, class, fields, &self.config)?);

        let mut next = MappingSnapshot::clone(&guard);
        match existing {
            Some(id) => next.entities[id.0 as usize] = Arc::clone(&entity),
            None => {
                next.entities.push(Arc::clone(&entity));
                next.by_name.insert(entity.type_name().to_string(), id);
            }
        }
        next.generation += 1;

        let mut guard = RwLockUpgradableReadGuard::upgrade(guard);
        *guard = Arc::new(next);
        tracing::info!(
            entity = %entity.type_name(),
            id = %id,
            rebuilt = existing.is_some(),
            generation = guard.generation,
            "published mapping snapshot"
        );
        Ok(entity)
    }

    /// The current snapshot. Stays valid and unchanged across later rebuilds.
    pub fn snapshot(&self) -> Arc<MappingSnapshot> {
        Arc::clone(&self.current.read())
    }

    pub fn entity(&self, type_name: &str) -> Option<Arc<PersistentEntity>> {
        self.current.read().entity(type_name).cloned()
    }

    /// Like `entity`, failing with `UnknownEntity` for unregistered types.
    pub fn require(&self, type_name: &str) -> Result<Arc<PersistentEntity>> {
        self.entity(type_name).ok_or_else(|| Error::UnknownEntity(type_name.to_string()))
    }

    pub fn entity_by_id(&self, id: EntityId) -> Option<Arc<PersistentEntity>> {
        self.current.read().entity_by_id(id).cloned()
    }

    /// Resolve a property's owner handle.
    pub fn owner_of(&self, property: &PersistentProperty) -> Option<Arc<PersistentEntity>> {
        self.entity_by_id(property.owner())
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }
}

impl Default for MappingContext {
    fn default() -> Self {
        Self::new(MappingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::Tag;
    use crate::types::{Primitive, TypeDescriptor};

    fn person_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id", TypeDescriptor::Wrapper(Primitive::I64)).with_tag(Tag::GraphId),
            FieldDescriptor::new("name", TypeDescriptor::String),
        ]
    }

    #[test]
    fn test_register_assigns_sequential_ids() {
        let ctx = MappingContext::default();
        let person = ctx.register(ClassType::node_entity("app.Person"), person_fields()).unwrap();
        let movie = ctx.register(ClassType::node_entity("app.Movie"), vec![]).unwrap();
        assert_eq!(person.id(), EntityId(0));
        assert_eq!(movie.id(), EntityId(1));
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.snapshot().generation(), 2);
    }

    #[test]
    fn test_owner_resolution() {
        let ctx = MappingContext::default();
        ctx.register(ClassType::node_entity("app.Person"), person_fields()).unwrap();
        let person = ctx.entity("app.Person").unwrap();
        let name = person.property("name").unwrap();
        let owner = ctx.owner_of(name).unwrap();
        assert_eq!(owner.type_name(), "app.Person");
    }

    #[test]
    fn test_require_unknown() {
        let ctx = MappingContext::default();
        assert!(matches!(ctx.require("app.Ghost"), Err(Error::UnknownEntity(name)) if name == "app.Ghost"));
    }

    #[test]
    fn test_rebuild_keeps_id_and_old_snapshot() {
        let ctx = MappingContext::default();
        ctx.register(ClassType::node_entity("app.Person"), person_fields()).unwrap();
        let before = ctx.snapshot();

        let mut fields = person_fields();
        fields.push(FieldDescriptor::new("age", Primitive::I32));
        let rebuilt = ctx.register(ClassType::node_entity("app.Person"), fields).unwrap();

        assert_eq!(rebuilt.id(), EntityId(0));
        assert_eq!(ctx.len(), 1);
        assert!(ctx.entity("app.Person").unwrap().property("age").is_some());
        assert!(before.entity("app.Person").unwrap().property("age").is_none());
    }

    #[test]
    fn test_failed_build_publishes_nothing() {
        let ctx = MappingContext::default();
        let fields = vec![
            FieldDescriptor::new("a", Primitive::I64).with_tag(Tag::GraphId),
            FieldDescriptor::new("b", Primitive::I64).with_tag(Tag::GraphId),
        ];
        assert!(ctx.register(ClassType::node_entity("app.Broken"), fields).is_err());
        assert!(ctx.is_empty());
        assert_eq!(ctx.snapshot().generation(), 0);
    }
}
