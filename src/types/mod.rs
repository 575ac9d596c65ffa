//! # Declared Types
//!
//! What a mapped field is declared as. Rust has no runtime class reflection,
//! so the mapping layer works over an explicit description of each field's
//! type: primitives, their nullable wrappers, strings, temporals, arrays,
//! collections and user classes.
//!
//! ```text
//! i64            → Primitive(I64)
//! Option<i64>    → Wrapper(I64)
//! Vec<[u8; 4]>   → Collection(Array(Primitive(I8)))
//! Vec<Person>    → Collection(Class(app.Person))
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Primitive + temporal kinds
// ============================================================================

/// Fixed-width scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Char => "char",
            Primitive::I8 => "i8",
            Primitive::I16 => "i16",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
        }
    }

    /// Name of the nullable wrapper form.
    pub fn wrapper_name(self) -> &'static str {
        match self {
            Primitive::Bool => "Boolean",
            Primitive::Char => "Character",
            Primitive::I8 => "Byte",
            Primitive::I16 => "Short",
            Primitive::I32 => "Integer",
            Primitive::I64 => "Long",
            Primitive::F32 => "Float",
            Primitive::F64 => "Double",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Primitive::Bool | Primitive::Char)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemporalKind {
    Date,
    Time,
    DateTime,
}

// ============================================================================
// User classes
// ============================================================================

/// Type-level entity tag of a user class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stereotype {
    /// Mapped to a graph node.
    Node,
    /// Mapped to a graph relationship, optionally with its own properties.
    Relationship,
}

/// A user-defined class as seen by the mapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType {
    /// Fully qualified name, e.g. `app.model.Person`.
    pub name: String,
    pub stereotype: Option<Stereotype>,
    /// Implements the node-backed capability.
    pub node_backed: bool,
    /// Implements the relationship-backed capability.
    pub relationship_backed: bool,
    /// Per-type property-naming override; `None` defers to `MappingConfig`.
    pub use_short_names: Option<bool>,
}

impl ClassType {
    /// A plain class with no entity tag and no backing capability.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stereotype: None,
            node_backed: false,
            relationship_backed: false,
            use_short_names: None,
        }
    }

    /// A class tagged as a node entity. Node entities are node-backed.
    pub fn node_entity(name: impl Into<String>) -> Self {
        Self {
            stereotype: Some(Stereotype::Node),
            node_backed: true,
            ..Self::plain(name)
        }
    }

    /// A class tagged as a relationship entity. Relationship entities are
    /// relationship-backed.
    pub fn relationship_entity(name: impl Into<String>) -> Self {
        Self {
            stereotype: Some(Stereotype::Relationship),
            relationship_backed: true,
            ..Self::plain(name)
        }
    }

    pub fn with_short_names(mut self, short: bool) -> Self {
        self.use_short_names = Some(short);
        self
    }

    /// Last segment of the qualified name.
    pub fn simple_name(&self) -> &str {
        let tail = self.name.rsplit(['.', ':']).next().unwrap_or(&self.name);
        if tail.is_empty() { &self.name } else { tail }
    }

    pub fn is_node_entity(&self) -> bool {
        self.stereotype == Some(Stereotype::Node)
    }

    pub fn is_relationship_entity(&self) -> bool {
        self.stereotype == Some(Stereotype::Relationship)
    }
}

// ============================================================================
// TypeDescriptor
// ============================================================================

/// The declared type of a mapped field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDescriptor {
    Primitive(Primitive),
    Wrapper(Primitive),
    String,
    Temporal(TemporalKind),
    Array(Box<TypeDescriptor>),
    /// Multi-element container (list, set, any iterable).
    Collection(Box<TypeDescriptor>),
    Class(ClassType),
}

impl TypeDescriptor {
    pub fn array_of(component: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(component))
    }

    pub fn collection_of(element: TypeDescriptor) -> Self {
        TypeDescriptor::Collection(Box::new(element))
    }

    pub fn is_array(&self) -> bool { matches!(self, TypeDescriptor::Array(_)) }
    pub fn is_collection(&self) -> bool { matches!(self, TypeDescriptor::Collection(_)) }

    /// Component type of an array, `None` otherwise.
    pub fn component_type(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Array(c) => Some(c),
            _ => None,
        }
    }

    /// The actual element type: the component of an array or collection,
    /// or the type itself for scalar references. Only one level is unwrapped.
    pub fn element_type(&self) -> &TypeDescriptor {
        match self {
            TypeDescriptor::Array(c) | TypeDescriptor::Collection(c) => c,
            other => other,
        }
    }

    /// Number of nested array levels (`0` for non-arrays).
    pub fn array_depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let TypeDescriptor::Array(c) = current {
            depth += 1;
            current = c;
        }
        depth
    }

    pub fn as_class(&self) -> Option<&ClassType> {
        match self {
            TypeDescriptor::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_node_entity(&self) -> bool {
        self.as_class().is_some_and(ClassType::is_node_entity)
    }

    pub fn is_node_backed(&self) -> bool {
        self.as_class().is_some_and(|c| c.node_backed)
    }

    pub fn is_relationship_backed(&self) -> bool {
        self.as_class().is_some_and(|c| c.relationship_backed)
    }

    /// Short human-readable name, e.g. `Person`, `i64[]`, `Collection<Long>`.
    pub fn simple_name(&self) -> String {
        match self {
            TypeDescriptor::Primitive(p) => p.name().to_string(),
            TypeDescriptor::Wrapper(p) => p.wrapper_name().to_string(),
            TypeDescriptor::String => "String".to_string(),
            TypeDescriptor::Temporal(TemporalKind::Date) => "Date".to_string(),
            TypeDescriptor::Temporal(TemporalKind::Time) => "Time".to_string(),
            TypeDescriptor::Temporal(TemporalKind::DateTime) => "DateTime".to_string(),
            TypeDescriptor::Array(c) => format!("{}[]", c.simple_name()),
            TypeDescriptor::Collection(e) => format!("Collection<{}>", e.simple_name()),
            TypeDescriptor::Class(c) => c.simple_name().to_string(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Array(c) => write!(f, "{}[]", c),
            TypeDescriptor::Collection(e) => write!(f, "Collection<{}>", e),
            TypeDescriptor::Class(c) => f.write_str(&c.name),
            other => f.write_str(&other.simple_name()),
        }
    }
}

impl From<ClassType> for TypeDescriptor {
    fn from(c: ClassType) -> Self { TypeDescriptor::Class(c) }
}

impl From<Primitive> for TypeDescriptor {
    fn from(p: Primitive) -> Self { TypeDescriptor::Primitive(p) }
}
