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
//! Quadtree-backed world
//!
//! The world region is a square centered on the origin. Each node owns the
//! entities whose bounding box fits inside its region but not inside any
//! single child quadrant. The root also owns anything that reaches outside
//! the world region, so every entity always has exactly one owning node.
//!
//! Radius queries only descend into nodes whose region overlaps the query
//! box, which makes them sub-linear for clustered worlds.
//!
//! Traversals hand out `&mut` entities, so positions can change under the
//! tree. Lookups and the interaction pass re-place each entity they hand
//! out as soon as its visitor returns, since later neighbor searches prune
//! by region. `for_entities` runs no searches, so it re-evaluates the whole
//! tree once at the end instead.

mod node;

use self::node::{Node, NodeId};
use crate::config::WorldConfig;
use crate::error::WorldError;
use crate::geom::{Aabb, Quadrant, Vec2};
use crate::world::{destroy, Entity, EntityId, IdAllocator, PairVisit, Scan, Visit, World, WorldStats};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// World backed by a region quadtree
///
/// # Examples
///
/// ```
/// use spatial_world::config::WorldConfig;
/// use spatial_world::geom::Vec2;
/// use spatial_world::world::{Entity, QuadtreeWorld, World};
///
/// struct Mine(Vec2);
///
/// impl Entity for Mine {
///     fn position(&self) -> Vec2 { self.0 }
///     fn radius(&self) -> f32 { 0.5 }
/// }
///
/// let mut world = QuadtreeWorld::with_config(&WorldConfig::new(100.0));
/// for i in 0..20 {
///     world.add_entity(Mine(Vec2::new(i as f32 * 4.0 - 40.0, 10.0))).unwrap();
/// }
/// assert_eq!(world.count(), 20);
/// assert!(world.debug().nodes > 1);
/// ```
pub struct QuadtreeWorld<E: Entity> {
    nodes: Vec<Node<E>>,
    owners: HashMap<EntityId, NodeId>,
    allocator: IdAllocator,
    radius: f32,
    node_capacity: usize,
    max_depth: u32,
    parallel: bool,
}

impl<E: Entity> QuadtreeWorld<E> {
    /// Create an empty world with the default configuration
    pub fn new() -> Self {
        Self::with_config(&WorldConfig::default())
    }

    /// Create an empty world from a configuration
    pub fn with_config(config: &WorldConfig) -> Self {
        let mut world = QuadtreeWorld {
            nodes: vec![Node::new(Self::root_region(config.radius), 0)],
            owners: HashMap::new(),
            allocator: IdAllocator::from_seed(config.seed, config.max_id_attempts.max(1)),
            radius: config.radius,
            node_capacity: config.node_capacity.max(1),
            max_depth: config.max_depth,
            parallel: false,
        };
        if config.parallel {
            world.set_parallel(true);
        }
        world
    }

    /// Current world half-width
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Number of allocated nodes, counted by walking the tree
    pub fn node_count(&self) -> usize {
        self.subtree_node_count(NodeId::ROOT)
    }

    fn root_region(radius: f32) -> Aabb {
        Aabb::from_center_half_extent(Vec2::zero(), radius)
    }

    fn node(&self, id: NodeId) -> &Node<E> {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<E> {
        &mut self.nodes[id.0]
    }

    /// Node ids in depth-first order: a node, then its children
    fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            let children = &self.node(id).children;
            stack.extend(children.iter().rev().flatten().copied());
        }
        order
    }

    fn subtree_node_count(&self, id: NodeId) -> usize {
        1 + self
            .node(id)
            .children()
            .map(|child| self.subtree_node_count(child))
            .sum::<usize>()
    }

    fn subtree_entity_count(&self, id: NodeId) -> usize {
        let node = self.node(id);
        node.len()
            + node
                .children()
                .map(|child| self.subtree_entity_count(child))
                .sum::<usize>()
    }

    fn subtree_depth(&self, id: NodeId) -> u32 {
        let node = self.node(id);
        node.children()
            .map(|child| self.subtree_depth(child))
            .max()
            .unwrap_or(node.depth)
    }

    fn child_or_alloc(&mut self, parent: NodeId, quadrant: Quadrant) -> NodeId {
        if let Some(child) = self.node(parent).child(quadrant) {
            return child;
        }
        let region = self.node(parent).region.quadrant(quadrant);
        let depth = self.node(parent).depth + 1;
        let child = NodeId(self.nodes.len());
        self.nodes.push(Node::new(region, depth));
        self.node_mut(parent).children[quadrant.index()] = Some(child);
        child
    }

    /// Insert starting at `start`, descending through split nodes
    fn insert_from(&mut self, start: NodeId, id: EntityId, entity: E) {
        let aabb = entity.aabb();
        let mut at = start;
        while self.node(at).split {
            match self.node(at).region.quadrant_containing(&aabb) {
                Some(quadrant) => at = self.child_or_alloc(at, quadrant),
                None => break,
            }
        }
        self.place(at, id, entity);
    }

    /// Append to a node's list, subdividing it on overflow
    fn place(&mut self, at: NodeId, id: EntityId, entity: E) {
        let (capacity, max_depth) = (self.node_capacity, self.max_depth);
        let node = self.node_mut(at);
        node.entities.push((id, entity));
        let overflowing = node.len() > capacity && !node.split && node.depth < max_depth;
        self.owners.insert(id, at);
        if overflowing {
            self.subdivide(at);
        }
    }

    /// Push every entity that fits a single quadrant down into that child
    ///
    /// Migrating entities are swapped out, so the ones that stay end up
    /// compacted at the front of the list without a second buffer.
    fn subdivide(&mut self, at: NodeId) {
        let region = self.node(at).region;
        self.node_mut(at).split = true;

        let mut moved = 0usize;
        let mut i = 0;
        while i < self.node(at).len() {
            let aabb = self.node(at).entities[i].1.aabb();
            match region.quadrant_containing(&aabb) {
                Some(quadrant) => {
                    let (id, entity) = self.node_mut(at).entities.swap_remove(i);
                    let child = self.child_or_alloc(at, quadrant);
                    self.insert_from(child, id, entity);
                    moved += 1;
                }
                None => i += 1,
            }
        }
        self.node_mut(at).reclaim();
        debug!(
            depth = self.node(at).depth,
            moved,
            kept = self.node(at).len(),
            "subdivided quadtree node"
        );
    }

    /// Find the node and slot holding `id`
    fn locate(&self, id: EntityId) -> Option<(NodeId, usize)> {
        let owner = *self.owners.get(&id)?;
        if let Some(index) = self.node(owner).index_of(id) {
            return Some((owner, index));
        }
        error!(%id, node = owner.0, "owner map points at a node that does not hold the entity");
        self.depth_first()
            .into_iter()
            .find_map(|node| self.node(node).index_of(id).map(|index| (node, index)))
    }

    /// Remove the entity at a slot and run its teardown hook
    fn remove_at(&mut self, node: NodeId, index: usize) {
        let (id, entity) = self.node_mut(node).take(index);
        self.owners.remove(&id);
        destroy(entity);
    }

    /// Whether the entity at a slot still belongs to its node
    fn fits(&self, node: NodeId, index: usize) -> bool {
        node == NodeId::ROOT || self.node(node).region.contains(&self.node(node).entities[index].1.aabb())
    }

    /// Re-insert the entity at a slot from the root if it outgrew its node
    ///
    /// Slots of the node shift when this moves something, so callers must
    /// locate entities again by id afterwards.
    fn settle(&mut self, node: NodeId, index: usize) {
        if !self.fits(node, index) {
            let (id, entity) = self.node_mut(node).take(index);
            debug!(%id, from = node.0, "relocating moved entity");
            self.insert_from(NodeId::ROOT, id, entity);
        }
    }

    /// Move every entity that outgrew its node back through the root
    fn reevaluate(&mut self) {
        let mut displaced = Vec::new();
        for n in 1..self.nodes.len() {
            let node = NodeId(n);
            let mut i = 0;
            let before = displaced.len();
            while i < self.node(node).len() {
                if self.fits(node, i) {
                    i += 1;
                } else {
                    displaced.push(self.node_mut(node).entities.swap_remove(i));
                }
            }
            if displaced.len() != before {
                self.node_mut(node).reclaim();
            }
        }
        if !displaced.is_empty() {
            debug!(count = displaced.len(), "relocating displaced entities");
        }
        for (id, entity) in displaced {
            self.insert_from(NodeId::ROOT, id, entity);
        }
    }

    /// Nodes whose region overlaps `query`; the root is always included
    fn overlapping_nodes(&self, query: &Aabb) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            found.push(id);
            for child in self.node(id).children() {
                if self.node(child).region.intersects(query) {
                    stack.push(child);
                }
            }
        }
        found
    }

    /// Identifiers within `radius` of `center`
    fn neighbors(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        let radius_squared = radius * radius;
        let query = Aabb::from_center_radius(center, radius);
        let mut found = Vec::new();
        for node in self.overlapping_nodes(&query) {
            for (id, entity) in &self.node(node).entities {
                if entity.position().distance_squared(center) <= radius_squared {
                    found.push(*id);
                }
            }
        }
        found
    }

    #[cfg(feature = "parallel")]
    fn collect_in_radius_parallel(&self, nodes: &[NodeId], center: Vec2, radius_squared: f32) -> Vec<(f32, EntityId, &E)> {
        nodes
            .par_iter()
            .flat_map_iter(|&node| {
                self.node(node).entities.iter().filter_map(move |(id, entity)| {
                    let d2 = entity.position().distance_squared(center);
                    (d2 <= radius_squared).then_some((d2, *id, entity))
                })
            })
            .collect()
    }
}

impl<E: Entity> Default for QuadtreeWorld<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> World<E> for QuadtreeWorld<E> {
    fn count(&self) -> usize {
        self.owners.len()
    }

    fn contains(&self, id: EntityId) -> bool {
        self.owners.contains_key(&id)
    }

    fn add_entity(&mut self, entity: E) -> Result<EntityId, WorldError> {
        if !entity.position().is_finite() {
            warn!("adding entity with non-finite position; it will live at the root");
        }
        let owners = &self.owners;
        let id = self.allocator.allocate(|id| owners.contains_key(&id))?;
        self.insert_from(NodeId::ROOT, id, entity);
        Ok(id)
    }

    fn entity_by_id<F>(&mut self, id: EntityId, visit: F)
    where
        F: FnOnce(Option<&mut E>) -> bool,
    {
        let Some((node, index)) = self.locate(id) else {
            visit(None);
            return;
        };
        if visit(Some(&mut self.node_mut(node).entities[index].1)) {
            self.remove_at(node, index);
        } else {
            self.settle(node, index);
        }
    }

    fn for_entities<F>(&mut self, mut visit: F) -> bool
    where
        F: FnMut(EntityId, &mut E) -> Visit,
    {
        let mut stopped = false;
        'nodes: for node in self.depth_first() {
            let mut i = 0;
            while i < self.node(node).len() {
                let (id, entity) = &mut self.node_mut(node).entities[i];
                let decision = visit(*id, entity);
                if decision.should_remove() {
                    // the last entity now sits at `i` and has not been visited
                    self.remove_at(node, i);
                } else {
                    i += 1;
                }
                if decision.should_stop() {
                    stopped = true;
                    break 'nodes;
                }
            }
        }
        self.reevaluate();
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
        let nodes = self.overlapping_nodes(&Aabb::from_center_radius(center, radius));

        #[cfg(feature = "parallel")]
        if self.parallel {
            for (d2, id, entity) in self.collect_in_radius_parallel(&nodes, center, radius_squared) {
                if visit(d2, id, entity) {
                    return true;
                }
            }
            return false;
        }

        for node in nodes {
            for (id, entity) in &self.node(node).entities {
                let d2 = entity.position().distance_squared(center);
                if d2 <= radius_squared && visit(d2, *id, entity) {
                    return true;
                }
            }
        }
        false
    }

    fn for_entities_and_others<P, S>(&mut self, mut primary: P, mut secondary: S) -> bool
    where
        P: FnMut(EntityId, &mut E) -> Scan,
        S: FnMut(EntityId, &mut E, EntityId, &mut E) -> PairVisit,
    {
        // Swap-removes reorder node lists, so walk a snapshot of identifiers
        // and find each one again when its turn comes. Visitors may move
        // entities, so anything that leaves its node is re-placed before the
        // next neighbor search prunes by region.
        let order: Vec<EntityId> = self
            .depth_first()
            .into_iter()
            .flat_map(|node| self.node(node).entities.iter().map(|(id, _)| *id))
            .collect();

        let mut stopped = false;
        for id in order {
            let Some((home, index)) = self.locate(id) else {
                continue;
            };
            let scan = primary(id, &mut self.node_mut(home).entities[index].1);
            self.settle(home, index);
            if scan == Scan::Stop {
                stopped = true;
                break;
            }
            let Some(radius) = scan.radius() else {
                continue;
            };
            let Some((home, index)) = self.locate(id) else {
                continue;
            };

            // Lift the primary out so it and a neighbor can be borrowed
            // together. Its owner entry stays in place while it is out.
            let (_, mut subject) = self.node_mut(home).entities.swap_remove(index);
            let neighbors = self.neighbors(subject.position(), radius);

            let mut primary_alive = true;
            let mut stop = false;
            for other_id in neighbors {
                let Some((node, slot)) = self.locate(other_id) else {
                    continue;
                };
                let other = &mut self.node_mut(node).entities[slot].1;
                let decision = secondary(id, &mut subject, other_id, other);
                if decision.remove_other {
                    self.remove_at(node, slot);
                } else {
                    self.settle(node, slot);
                }
                primary_alive = !decision.remove_primary;
                stop = decision.stop;
                if !primary_alive || stop {
                    break;
                }
            }

            if primary_alive {
                self.node_mut(home).entities.push((id, subject));
                let slot = self.node(home).len() - 1;
                self.settle(home, slot);
            } else {
                self.owners.remove(&id);
                self.node_mut(home).reclaim();
                destroy(subject);
            }
            if stop {
                stopped = true;
                break;
            }
        }
        stopped
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
        let old_nodes = std::mem::replace(&mut self.nodes, vec![Node::new(Self::root_region(radius), 0)]);
        self.owners.clear();
        debug!(from = self.radius, to = radius, nodes = old_nodes.len(), "re-rooting quadtree");
        self.radius = radius;
        for node in old_nodes {
            for (id, entity) in node.entities {
                self.insert_from(NodeId::ROOT, id, entity);
            }
        }
    }

    fn debug(&self) -> WorldStats {
        let stats = WorldStats {
            entities: self.subtree_entity_count(NodeId::ROOT),
            nodes: self.node_count(),
            depth: self.subtree_depth(NodeId::ROOT),
            radius: self.radius,
        };
        info!(%stats, "quadtree world");
        stats
    }

    fn check_invariants(&self) -> Result<(), WorldError> {
        let violation = |msg: String| -> Result<(), WorldError> {
            error!("quadtree invariant violated: {}", msg);
            Err(WorldError::InvariantViolation(msg))
        };

        let held = self.subtree_entity_count(NodeId::ROOT);
        if held != self.owners.len() {
            return violation(format!(
                "tree holds {} entities but {} are registered",
                held,
                self.owners.len()
            ));
        }
        for node_id in self.depth_first() {
            let node = self.node(node_id);
            for child in node.children() {
                let child_node = self.node(child);
                if child_node.depth != node.depth + 1 || !node.region.contains(&child_node.region) {
                    return violation(format!("node {} is not nested in its parent {}", child.0, node_id.0));
                }
            }
            for (index, (id, _)) in node.entities.iter().enumerate() {
                if !id.is_valid() {
                    return violation(format!("invalid id stored in node {}", node_id.0));
                }
                if self.owners.get(id) != Some(&node_id) {
                    return violation(format!("{} is held by node {} but registered elsewhere", id, node_id.0));
                }
                if !self.fits(node_id, index) {
                    return violation(format!("{} does not fit inside node {}", id, node_id.0));
                }
            }
        }
        Ok(())
    }
}
