//! Composition-tree primitives for the fleet.
//!
//! Entities form a rooted containment hierarchy: groups hold ordered
//! children, leaves are concrete entities such as cluster nodes or the
//! manager. [`discover`] walks the tree and extracts every entity matching a
//! caller-supplied capability predicate, without descending past a match.

pub mod entity;
pub mod discover;

pub use discover::{capability, discover};
pub use entity::{next_entity_id, Entity, Group};
