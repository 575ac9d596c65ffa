//! Relationship direction.

use serde::{Deserialize, Serialize};

/// Traversal direction of a mapped relationship, seen from the owning entity.
///
/// `Outgoing` is the default for both explicit relationship tags that omit a
/// direction and relationships inferred between two node entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Outgoing,
    Incoming,
    Both,
}

impl Direction {
    /// The same relationship seen from the other end.
    pub fn reverse(self) -> Self {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
            Direction::Both => Direction::Both,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Direction::Outgoing => "OUTGOING",
            Direction::Incoming => "INCOMING",
            Direction::Both => "BOTH",
        };
        f.write_str(s)
    }
}
