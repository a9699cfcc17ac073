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
//! The entity store
//!
//! This module defines the [`World`] contract and its two implementations:
//! - [`LinearWorld`]: hash map keyed by identifier, brute-force queries
//! - [`QuadtreeWorld`]: region quadtree, pruned radius queries
//!
//! Simulation code is written against [`World`] and does not care which
//! variant backs it. Both variants assign identifiers on insertion and run
//! each removed entity's [`Entity::close`] hook exactly once.

mod entity;
mod id;
mod linear;
mod quadtree;
mod visit;

pub use entity::{Entity, EntityId};
pub use id::IdAllocator;
pub use linear::LinearWorld;
pub use quadtree::QuadtreeWorld;
pub use visit::{PairVisit, Scan, Visit};

use crate::error::WorldError;
use crate::geom::Vec2;
use std::fmt;

/// Capability set shared by every entity store
///
/// A world has a single mutator per tick. Visitors receive `&mut` access to
/// the entity being visited; they cannot reach the world itself while a
/// traversal runs, so every removal goes through the returned decision.
pub trait World<E: Entity> {
    /// Number of live entities
    fn count(&self) -> usize;

    /// Whether the world holds no entities
    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Whether `id` names a live entity
    fn contains(&self, id: EntityId) -> bool;

    /// Insert an entity and return the identifier assigned to it
    ///
    /// # Errors
    ///
    /// [`WorldError::ExhaustedIdSpace`] if no free identifier was found.
    fn add_entity(&mut self, entity: E) -> Result<EntityId, WorldError>;

    /// Look up an entity by identifier
    ///
    /// `visit` receives `None` if nothing lives under `id`. Returning `true`
    /// removes the entity that was found (and is ignored otherwise).
    fn entity_by_id<F>(&mut self, id: EntityId, visit: F)
    where
        F: FnOnce(Option<&mut E>) -> bool;

    /// Remove an entity, returning whether it was live
    fn remove(&mut self, id: EntityId) -> bool {
        let mut found = false;
        self.entity_by_id(id, |entity| {
            found = entity.is_some();
            true
        });
        found
    }

    /// Visit every live entity once, in no particular order
    ///
    /// Returns `true` if a visitor stopped the traversal early.
    fn for_entities<F>(&mut self, visit: F) -> bool
    where
        F: FnMut(EntityId, &mut E) -> Visit;

    /// Visit every entity whose position is within `radius` of `center`
    ///
    /// The visitor receives the squared distance, the identifier and the
    /// entity, and returns `true` to stop. Returns `true` if stopped early.
    fn for_entities_in_radius<F>(&self, center: Vec2, radius: f32, visit: F) -> bool
    where
        F: FnMut(f32, EntityId, &E) -> bool;

    /// Pairwise interaction pass
    ///
    /// Every live entity is offered to `primary` once. If it answers
    /// [`Scan::Within`] with a positive radius, `secondary` is called for
    /// each other entity within that radius of the primary. The set of
    /// neighbors is fixed when the scan starts; neighbors removed during
    /// the scan are not visited again, and removing the primary ends its
    /// scan. Returns `true` if a visitor stopped the pass early.
    fn for_entities_and_others<P, S>(&mut self, primary: P, secondary: S) -> bool
    where
        P: FnMut(EntityId, &mut E) -> Scan,
        S: FnMut(EntityId, &mut E, EntityId, &mut E) -> PairVisit;

    /// Request parallel execution of read-only queries
    ///
    /// Returns whether the request was accepted.
    fn set_parallel(&mut self, enable: bool) -> bool;

    /// Whether read-only queries currently run in parallel
    fn is_parallel(&self) -> bool;

    /// Tell the world its spatial extent changed
    fn resize(&mut self, radius: f32);

    /// Log and return a diagnostic snapshot
    fn debug(&self) -> WorldStats;

    /// Verify internal bookkeeping
    ///
    /// # Errors
    ///
    /// [`WorldError::InvariantViolation`] describing the first problem found.
    fn check_invariants(&self) -> Result<(), WorldError>;
}

/// Diagnostic snapshot of a world
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldStats {
    /// Live entities
    pub entities: usize,
    /// Allocated tree nodes (zero for the linear store)
    pub nodes: usize,
    /// Deepest allocated tree node (zero for the linear store)
    pub depth: u32,
    /// Current world half-width
    pub radius: f32,
}

impl fmt::Display for WorldStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entities={} nodes={} depth={} radius={}",
            self.entities, self.nodes, self.depth, self.radius
        )
    }
}

/// Run the teardown hook and drop the entity
pub(crate) fn destroy<E: Entity>(mut entity: E) {
    entity.close();
}
