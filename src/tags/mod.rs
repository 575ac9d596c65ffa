//! # Field Tags
//!
//! Declarative markers attached to a mapped field, and the read-only lookup
//! built from them. Extraction applies no rules; it only answers "is a tag
//! of this kind attached, and with which parameters".
//!
//! A field carries at most one tag per kind in its lookup. When the same
//! kind is declared twice the last declaration is kept and a warning is
//! logged; no conflict is reported.

use hashbrown::HashMap;

use crate::index::IndexLevel;
use crate::model::Direction;
use crate::types::TypeDescriptor;

/// Identifier of a tag kind. Lookups are keyed by kind, never by parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    GraphId,
    RelatedTo,
    RelatedToVia,
    NodeEntity,
    Indexed,
    Transient,
}

/// A tag attached to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    /// Marks the identity property (graph-assigned numeric id).
    GraphId,

    /// Simple relationship to another node entity.
    RelatedTo {
        /// Relationship type label. Empty means "derive from the field name".
        rel_type: String,
        direction: Direction,
        /// Overrides the target type taken from the field's declared type.
        element_class: Option<TypeDescriptor>,
    },

    /// Relationship exposed through an intermediate relationship entity.
    RelatedToVia {
        rel_type: String,
        direction: Direction,
        /// The relationship entity type. Defaults to the field's element type.
        element_class: Option<TypeDescriptor>,
    },

    /// Field-level node-entity marker.
    NodeEntity,

    Indexed {
        index_name: String,
        fulltext: bool,
        /// Empty means "use the field's own name".
        field_name: String,
        level: IndexLevel,
    },

    /// Excludes the field from persistence and from relationship inference.
    Transient,
}

impl Tag {
    pub fn kind(&self) -> TagKind {
        match self {
            Tag::GraphId => TagKind::GraphId,
            Tag::RelatedTo { .. } => TagKind::RelatedTo,
            Tag::RelatedToVia { .. } => TagKind::RelatedToVia,
            Tag::NodeEntity => TagKind::NodeEntity,
            Tag::Indexed { .. } => TagKind::Indexed,
            Tag::Transient => TagKind::Transient,
        }
    }

    /// `RelatedTo` with a label and direction.
    pub fn related_to(rel_type: impl Into<String>, direction: Direction) -> Self {
        Tag::RelatedTo { rel_type: rel_type.into(), direction, element_class: None }
    }

    /// `RelatedToVia` with a label and direction.
    pub fn related_to_via(rel_type: impl Into<String>, direction: Direction) -> Self {
        Tag::RelatedToVia { rel_type: rel_type.into(), direction, element_class: None }
    }

    /// `Indexed` with a name and level, no full-text and no field-name override.
    pub fn indexed(index_name: impl Into<String>, level: IndexLevel) -> Self {
        Tag::Indexed {
            index_name: index_name.into(),
            fulltext: false,
            field_name: String::new(),
            level,
        }
    }

    /// `Indexed` into a full-text index.
    pub fn fulltext(index_name: impl Into<String>) -> Self {
        Tag::Indexed {
            index_name: index_name.into(),
            fulltext: true,
            field_name: String::new(),
            level: IndexLevel::default(),
        }
    }

    /// Explicit relationship declaration (`RelatedTo` or `RelatedToVia`).
    pub fn is_relationship(&self) -> bool {
        matches!(self.kind(), TagKind::RelatedTo | TagKind::RelatedToVia)
    }
}

// ============================================================================
// TagLookup
// ============================================================================

/// Read-only map from tag kind to the tag attached to one field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagLookup {
    tags: HashMap<TagKind, Tag>,
}

impl TagLookup {
    /// Extract the lookup for a field's declared tags. Pure; never fails.
    pub fn extract<'a>(tags: impl IntoIterator<Item = &'a Tag>) -> Self {
        let mut map = HashMap::new();
        for tag in tags {
            if let Some(previous) = map.insert(tag.kind(), tag.clone()) {
                tracing::warn!(kind = ?previous.kind(), "duplicate tag on field, keeping the last declaration");
            }
        }
        Self { tags: map }
    }

    pub fn has_tag(&self, kind: TagKind) -> bool {
        self.tags.contains_key(&kind)
    }

    pub fn get_tag(&self, kind: TagKind) -> Option<&Tag> {
        self.tags.get(&kind)
    }

    /// All retained tags, in no particular order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
