//! Runtime values read from and written to mapped fields.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Graph-assigned node identifier, held by identity fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to another mapped instance (the value of a relationship field).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Fully qualified name of the referenced type.
    pub type_name: String,
    /// `None` until the referenced instance has been persisted.
    pub id: Option<NodeId>,
}

impl EntityRef {
    pub fn new(type_name: impl Into<String>, id: Option<NodeId>) -> Self {
        Self { type_name: type_name.into(), id }
    }
}

/// Value passed through a field accessor.
///
/// Covers the graph-native scalars plus the shapes the mapper needs to move
/// in and out of domain objects:
/// - Scalars: Bool, Int, Float, Char, String
/// - Temporal: Date, Time, DateTime (stored as string properties)
/// - Containers: List (arrays and collections)
/// - Graph: Entity (relationship targets)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(DateTime<Utc>),
    List(Vec<Value>),
    Entity(EntityRef),
}

// ============================================================================
// Type checking
// ============================================================================

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::Int(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::Char(_) => "CHAR",
            Value::String(_) => "STRING",
            Value::Date(_) => "DATE",
            Value::Time(_) => "TIME",
            Value::DateTime(_) => "DATETIME",
            Value::List(_) => "LIST",
            Value::Entity(_) => "ENTITY",
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityRef> {
        match self {
            Value::Entity(e) => Some(e),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<i8> for Value { fn from(v: i8) -> Self { Value::Int(v as i64) } }
impl From<i16> for Value { fn from(v: i16) -> Self { Value::Int(v as i64) } }
impl From<i32> for Value { fn from(v: i32) -> Self { Value::Int(v as i64) } }
impl From<i64> for Value { fn from(v: i64) -> Self { Value::Int(v) } }
impl From<f32> for Value { fn from(v: f32) -> Self { Value::Float(v as f64) } }
impl From<f64> for Value { fn from(v: f64) -> Self { Value::Float(v) } }
impl From<char> for Value { fn from(v: char) -> Self { Value::Char(v) } }
impl From<String> for Value { fn from(v: String) -> Self { Value::String(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::String(v.to_owned()) } }
impl From<NaiveDate> for Value { fn from(v: NaiveDate) -> Self { Value::Date(v) } }
impl From<NaiveTime> for Value { fn from(v: NaiveTime) -> Self { Value::Time(v) } }
impl From<DateTime<Utc>> for Value { fn from(v: DateTime<Utc>) -> Self { Value::DateTime(v) } }
impl From<EntityRef> for Value { fn from(v: EntityRef) -> Self { Value::Entity(v) } }
impl From<NodeId> for Value { fn from(v: NodeId) -> Self { Value::Int(v.0 as i64) } }
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self { Value::List(v.into_iter().map(Into::into).collect()) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self { v.map_or(Value::Null, Into::into) }
}
