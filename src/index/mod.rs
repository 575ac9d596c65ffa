//! Index metadata for indexed fields.

use serde::{Deserialize, Serialize};

/// Type of index a field's values go into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexType {
    /// Exact-match lookup index.
    Exact,
    /// Full-text search index.
    FullText,
}

/// Scope of an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexLevel {
    /// One index per declaring type.
    #[default]
    Class,
    /// One index per concrete instance type.
    Instance,
    /// A single index shared by every type.
    Global,
}

/// Index settings for one field, copied verbatim from its index tag.
///
/// Uniqueness of index names across entities is not checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInfo {
    /// Empty means the default index.
    pub index_name: String,
    pub fulltext: bool,
    /// Name the value is indexed under. Defaults to the declaring field's name.
    pub field_name: String,
    pub level: IndexLevel,
}

impl IndexInfo {
    /// Build from tag parameters. An empty `field_name` override resolves
    /// to `declared_field`.
    pub fn new(
        index_name: impl Into<String>,
        fulltext: bool,
        field_name: impl Into<String>,
        level: IndexLevel,
        declared_field: &str,
    ) -> Self {
        let field_name = field_name.into();
        Self {
            index_name: index_name.into(),
            fulltext,
            field_name: if field_name.is_empty() { declared_field.to_string() } else { field_name },
            level,
        }
    }

    pub fn index_type(&self) -> IndexType {
        if self.fulltext { IndexType::FullText } else { IndexType::Exact }
    }

    pub fn has_default_name(&self) -> bool {
        self.index_name.is_empty()
    }

    /// The index name, or `default` when none was declared.
    pub fn resolved_index_name<'a>(&'a self, default: &'a str) -> &'a str {
        if self.index_name.is_empty() { default } else { &self.index_name }
    }
}
