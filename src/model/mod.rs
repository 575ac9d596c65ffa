//! # Runtime Model
//!
//! The values that cross the field-access boundary and the relationship
//! direction shared by tags and classification records.
//!
//! Design rule: pure data — no I/O, no state, no locks.

pub mod relationship;
pub mod value;

pub use relationship::Direction;
pub use value::{EntityRef, NodeId, Value};
