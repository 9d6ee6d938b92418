//! Entity handles.
//!
//! An [`Entity`] is an opaque handle into the external entity store. The
//! prediction core never dereferences it; it only keys tracking records by
//! it.

use serde::{Deserialize, Serialize};

/// A handle to an entity owned by the entity store.
///
/// A destroyed entity's handle can still show up in late network events, so
/// every lookup keyed by an `Entity` returns an `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u64);

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
