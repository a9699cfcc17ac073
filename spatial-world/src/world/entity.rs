// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Entity handles and the entity contract
//!
//! The store owns entity values outright. An [`EntityId`] is the only way
//! simulation code refers to an entity between ticks.

use crate::geom::{Aabb, Vec2};
use std::fmt;

/// Opaque handle identifying one live entity
///
/// Zero is reserved as [`EntityId::INVALID`]; the store never hands it out.
/// Identifiers are unique among live entities and may be reused after the
/// entity they named has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// The reserved "no entity" handle
    pub const INVALID: EntityId = EntityId(0);

    /// Create an EntityId from a raw u32 value
    pub const fn new(id: u32) -> Self {
        EntityId(id)
    }

    /// Get the raw u32 value
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Returns `false` for the reserved zero handle
    pub const fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        EntityId::INVALID
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// A game object the world can store
///
/// The world only needs a position and a containment radius to index an
/// entity. `close` is the teardown hook: the store calls it exactly once,
/// right before it drops an entity it removed.
///
/// # Examples
///
/// ```
/// use spatial_world::geom::Vec2;
/// use spatial_world::world::Entity;
///
/// struct Buoy {
///     position: Vec2,
/// }
///
/// impl Entity for Buoy {
///     fn position(&self) -> Vec2 {
///         self.position
///     }
///
///     fn radius(&self) -> f32 {
///         2.0
///     }
/// }
///
/// let buoy = Buoy { position: Vec2::new(10.0, 0.0) };
/// assert_eq!(buoy.aabb().min(), Vec2::new(8.0, -2.0));
/// ```
pub trait Entity: Send + Sync {
    /// Current position of the entity's center
    fn position(&self) -> Vec2;

    /// Containment radius used to build the entity's bounding box
    fn radius(&self) -> f32;

    /// Teardown hook invoked once on removal
    fn close(&mut self) {}

    /// Bounding box `[position - radius, position + radius]`
    fn aabb(&self) -> Aabb {
        Aabb::from_center_radius(self.position(), self.radius())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_roundtrip() {
        let id = EntityId::new(42);
        assert_eq!(id.raw(), 42);
        assert!(id.is_valid());
        assert_eq!(id.to_string(), "Entity(42)");
    }

    #[test]
    fn test_invalid_id() {
        assert!(!EntityId::INVALID.is_valid());
        assert_eq!(EntityId::default(), EntityId::INVALID);
        assert_eq!(EntityId::new(0), EntityId::INVALID);
    }
}
