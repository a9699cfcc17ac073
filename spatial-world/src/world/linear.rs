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
//! Hash-map backed world
//!
//! The baseline store: O(1) insert, lookup and removal, O(n) radius
//! queries and O(n²) interaction passes. It is the reference the quadtree
//! is checked against.

use crate::config::WorldConfig;
use crate::error::WorldError;
use crate::geom::Vec2;
use crate::world::{destroy, Entity, EntityId, IdAllocator, PairVisit, Scan, Visit, World, WorldStats};
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// World backed by a map from identifier to entity
///
/// # Examples
///
/// ```
/// use spatial_world::geom::Vec2;
/// use spatial_world::world::{Entity, LinearWorld, World};
///
/// struct Rock(Vec2);
///
/// impl Entity for Rock {
///     fn position(&self) -> Vec2 { self.0 }
///     fn radius(&self) -> f32 { 1.0 }
/// }
///
/// let mut world = LinearWorld::new();
/// let id = world.add_entity(Rock(Vec2::new(3.0, 4.0))).unwrap();
/// assert_eq!(world.count(), 1);
///
/// let mut hits = Vec::new();
/// world.for_entities_in_radius(Vec2::zero(), 5.0, |d2, hit, _| {
///     hits.push((hit, d2));
///     false
/// });
/// assert_eq!(hits, vec![(id, 25.0)]);
/// ```
pub struct LinearWorld<E: Entity> {
    entities: HashMap<EntityId, E>,
    allocator: IdAllocator,
    radius: f32,
    parallel: bool,
}

impl<E: Entity> LinearWorld<E> {
    /// Create an empty world with the default configuration
    pub fn new() -> Self {
        Self::with_config(&WorldConfig::default())
    }

    /// Create an empty world from a configuration
    pub fn with_config(config: &WorldConfig) -> Self {
        let mut world = LinearWorld {
            entities: HashMap::new(),
            allocator: IdAllocator::from_seed(config.seed, config.max_id_attempts.max(1)),
            radius: config.radius,
            parallel: false,
        };
        if config.parallel {
            world.set_parallel(true);
        }
        world
    }

    /// Create an empty world with room for `capacity` entities
    pub fn with_capacity(capacity: usize) -> Self {
        let mut world = Self::new();
        world.entities.reserve(capacity);
        world
    }

    /// Current world half-width
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[cfg(feature = "parallel")]
    fn collect_in_radius_parallel(&self, center: Vec2, radius_squared: f32) -> Vec<(f32, EntityId, &E)> {
        self.entities
            .par_iter()
            .filter_map(|(id, entity)| {
                let d2 = entity.position().distance_squared(center);
                (d2 <= radius_squared).then_some((d2, *id, entity))
            })
            .collect()
    }
}

impl<E: Entity> Default for LinearWorld<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> World<E> for LinearWorld<E> {
    fn count(&self) -> usize {
        self.entities.len()
    }

    fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    fn add_entity(&mut self, entity: E) -> Result<EntityId, WorldError> {
        if !entity.position().is_finite() {
            warn!("adding entity with non-finite position");
        }
        let entities = &self.entities;
        let id = self.allocator.allocate(|id| entities.contains_key(&id))?;
        self.entities.insert(id, entity);
        Ok(id)
    }

    fn entity_by_id<F>(&mut self, id: EntityId, visit: F)
    where
        F: FnOnce(Option<&mut E>) -> bool,
    {
        let found = self.entities.get_mut(&id);
        let present = found.is_some();
        if visit(found) && present {
            if let Some(entity) = self.entities.remove(&id) {
                destroy(entity);
            }
        }
    }

    fn for_entities<F>(&mut self, mut visit: F) -> bool
    where
        F: FnMut(EntityId, &mut E) -> Visit,
    {
        // retain visits each entry once and tolerates removing the current one
        let mut stopped = false;
        self.entities.retain(|&id, entity| {
            if stopped {
                return true;
            }
            let decision = visit(id, entity);
            stopped = decision.should_stop();
            if decision.should_remove() {
                entity.close();
                false
            } else {
                true
            }
        });
        stopped
    }

    fn for_entities_in_radius<F>(&self, center: Vec2, radius: f32, mut visit: F) -> bool
    where
        F: FnMut(f32, EntityId, &E) -> bool,
    {
        if !(radius >= 0.0) {
            return false;
        }
        let radius_squared = radius * radius;

        #[cfg(feature = "parallel")]
        if self.parallel {
            for (d2, id, entity) in self.collect_in_radius_parallel(center, radius_squared) {
                if visit(d2, id, entity) {
                    return true;
                }
            }
            return false;
        }

        for (id, entity) in &self.entities {
            let d2 = entity.position().distance_squared(center);
            if d2 <= radius_squared && visit(d2, *id, entity) {
                return true;
            }
        }
        false
    }

    fn for_entities_and_others<P, S>(&mut self, mut primary: P, mut secondary: S) -> bool
    where
        P: FnMut(EntityId, &mut E) -> Scan,
        S: FnMut(EntityId, &mut E, EntityId, &mut E) -> PairVisit,
    {
        let ids: Vec<EntityId> = self.entities.keys().copied().collect();

        for id in ids {
            let scan = match self.entities.get_mut(&id) {
                Some(entity) => primary(id, entity),
                // removed earlier in this pass
                None => continue,
            };
            if scan == Scan::Stop {
                return true;
            }
            let Some(radius) = scan.radius() else {
                continue;
            };

            // Lift the primary out so it and a neighbor can be borrowed together.
            let Some(mut subject) = self.entities.remove(&id) else {
                continue;
            };
            let center = subject.position();
            let radius_squared = radius * radius;
            let neighbors: Vec<EntityId> = self
                .entities
                .iter()
                .filter(|(_, other)| other.position().distance_squared(center) <= radius_squared)
                .map(|(other_id, _)| *other_id)
                .collect();

            let mut primary_alive = true;
            let mut stop = false;
            for other_id in neighbors {
                let Some(other) = self.entities.get_mut(&other_id) else {
                    continue;
                };
                let decision = secondary(id, &mut subject, other_id, other);
                if decision.remove_other {
                    if let Some(other) = self.entities.remove(&other_id) {
                        destroy(other);
                    }
                }
                primary_alive = !decision.remove_primary;
                stop = decision.stop;
                if !primary_alive || stop {
                    break;
                }
            }

            if primary_alive {
                self.entities.insert(id, subject);
            } else {
                destroy(subject);
            }
            if stop {
                return true;
            }
        }
        false
    }

    fn set_parallel(&mut self, enable: bool) -> bool {
        if cfg!(feature = "parallel") {
            self.parallel = enable;
        } else if enable {
            warn!("built without the `parallel` feature; queries stay sequential");
        }
        true
    }

    fn is_parallel(&self) -> bool {
        self.parallel
    }

    fn resize(&mut self, radius: f32) {
        if !(radius >= 0.0 && radius.is_finite()) {
            warn!(radius, "ignoring resize to invalid radius");
            return;
        }
        debug!(from = self.radius, to = radius, "linear world resized");
        self.radius = radius;
    }

    fn debug(&self) -> WorldStats {
        let stats = WorldStats {
            entities: self.entities.len(),
            nodes: 0,
            depth: 0,
            radius: self.radius,
        };
        info!(%stats, "linear world");
        stats
    }

    fn check_invariants(&self) -> Result<(), WorldError> {
        if self.entities.contains_key(&EntityId::INVALID) {
            return Err(WorldError::InvariantViolation(
                "invalid id stored as a key".to_string(),
            ));
        }
        Ok(())
    }
}
