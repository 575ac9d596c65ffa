//! Relationship metadata for relationship fields.

use serde::{Deserialize, Serialize};

use crate::model::Direction;
use crate::types::TypeDescriptor;

/// How a relationship field maps onto graph relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipInfo {
    /// Type at the other end (element type of the field unless overridden).
    pub target_type: TypeDescriptor,
    pub direction: Direction,
    /// Relationship type label. Empty for inferred relationships.
    pub rel_type: String,
    /// Intermediate relationship-entity type, for "via" relationships.
    pub via: Option<TypeDescriptor>,
    /// The field holds many targets (array or collection).
    pub multiple: bool,
}

impl RelationshipInfo {
    /// From an explicit simple-relationship declaration.
    pub fn from_related_to(
        declared: &TypeDescriptor,
        rel_type: &str,
        direction: Direction,
        element_class: Option<&TypeDescriptor>,
    ) -> Self {
        Self {
            target_type: element_class.unwrap_or_else(|| declared.element_type()).clone(),
            direction,
            rel_type: rel_type.to_string(),
            via: None,
            multiple: is_multiple(declared),
        }
    }

    /// From a "via intermediate relationship entity" declaration.
    pub fn from_related_to_via(
        declared: &TypeDescriptor,
        rel_type: &str,
        direction: Direction,
        element_class: Option<&TypeDescriptor>,
    ) -> Self {
        let element = declared.element_type();
        Self {
            target_type: element.clone(),
            direction,
            rel_type: rel_type.to_string(),
            via: Some(element_class.unwrap_or(element).clone()),
            multiple: is_multiple(declared),
        }
    }

    /// Default relationship between two node entities: default direction,
    /// no label.
    pub fn inferred(declared: &TypeDescriptor) -> Self {
        Self {
            target_type: declared.element_type().clone(),
            direction: Direction::default(),
            rel_type: String::new(),
            via: None,
            multiple: is_multiple(declared),
        }
    }

    pub fn is_via(&self) -> bool {
        self.via.is_some()
    }

    /// The label to write: the declared one, or the field name when empty.
    pub fn effective_type<'a>(&'a self, field_name: &'a str) -> &'a str {
        if self.rel_type.is_empty() { field_name } else { &self.rel_type }
    }
}

fn is_multiple(declared: &TypeDescriptor) -> bool {
    declared.is_array() || declared.is_collection()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClassType;

    fn person() -> TypeDescriptor {
        ClassType::node_entity("app.Person").into()
    }

    #[test]
    fn test_related_to_uses_element_type() {
        let declared = TypeDescriptor::collection_of(person());
        let info = RelationshipInfo::from_related_to(&declared, "KNOWS", Direction::Both, None);
        assert_eq!(info.target_type, person());
        assert_eq!(info.rel_type, "KNOWS");
        assert!(info.multiple);
        assert!(!info.is_via());
    }

    #[test]
    fn test_related_to_element_class_override() {
        let declared: TypeDescriptor = ClassType::plain("app.Thing").into();
        let info = RelationshipInfo::from_related_to(&declared, "OWNS", Direction::Outgoing, Some(&person()));
        assert_eq!(info.target_type, person());
        assert!(!info.multiple);
    }

    #[test]
    fn test_via_records_intermediate_type() {
        let role: TypeDescriptor = ClassType::relationship_entity("app.Role").into();
        let declared = TypeDescriptor::collection_of(role.clone());
        let info = RelationshipInfo::from_related_to_via(&declared, "ACTS_IN", Direction::Outgoing, None);
        assert_eq!(info.via, Some(role));
    }

    #[test]
    fn test_effective_type() {
        let info = RelationshipInfo::inferred(&person());
        assert_eq!(info.direction, Direction::Outgoing);
        assert_eq!(info.effective_type("friend"), "friend");
        let named = RelationshipInfo::from_related_to(&person(), "KNOWS", Direction::Outgoing, None);
        assert_eq!(named.effective_type("friend"), "KNOWS");
    }
}
