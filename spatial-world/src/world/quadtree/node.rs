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
//! Quadtree nodes
//!
//! Nodes live in an arena owned by the world and refer to their children by
//! index. A node starts as a leaf; once it overflows it is marked split and
//! children are allocated lazily, one quadrant at a time. Nodes are never
//! merged back.

use crate::geom::{Aabb, Quadrant};
use crate::world::EntityId;

/// Index of a node in the world's node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node always occupies slot zero
    pub(crate) const ROOT: NodeId = NodeId(0);
}

/// One region of the tree and the entities it owns
///
/// Entities held here either straddle a quadrant boundary, or have not been
/// pushed down because the node never overflowed.
pub(crate) struct Node<E> {
    pub(crate) region: Aabb,
    pub(crate) depth: u32,
    pub(crate) split: bool,
    pub(crate) children: [Option<NodeId>; 4],
    pub(crate) entities: Vec<(EntityId, E)>,
}

impl<E> Node<E> {
    pub(crate) fn new(region: Aabb, depth: u32) -> Self {
        Node {
            region,
            depth,
            split: false,
            children: [None; 4],
            entities: Vec::new(),
        }
    }

    pub(crate) fn child(&self, quadrant: Quadrant) -> Option<NodeId> {
        self.children[quadrant.index()]
    }

    /// Allocated children in quadrant order
    pub(crate) fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().flatten().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.entities.len()
    }

    pub(crate) fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|(held, _)| *held == id)
    }

    /// Swap-remove the entity at `index`
    ///
    /// The last entity takes the vacated slot and the list shrinks by one,
    /// so order is not preserved. The removed value is moved out, leaving
    /// nothing behind in the spare capacity.
    pub(crate) fn take(&mut self, index: usize) -> (EntityId, E) {
        let removed = self.entities.swap_remove(index);
        self.reclaim();
        removed
    }

    /// Give back memory once the list is at most a third full
    pub(crate) fn reclaim(&mut self) {
        if self.entities.len() <= self.entities.capacity() / 3 {
            self.entities.shrink_to_fit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Vec2;

    fn node_with(tags: &[u32]) -> Node<u32> {
        let mut node = Node::new(Aabb::from_center_half_extent(Vec2::zero(), 10.0), 0);
        for &tag in tags {
            node.entities.push((EntityId::new(tag), tag * 100));
        }
        node
    }

    #[test]
    fn test_take_first_of_three_keeps_the_others() {
        let mut node = node_with(&[1, 2, 3]);
        let (id, value) = node.take(0);
        assert_eq!(id, EntityId::new(1));
        assert_eq!(value, 100);
        assert_eq!(node.len(), 2);

        // the last entity moved into slot 0
        assert_eq!(node.entities[0], (EntityId::new(3), 300));
        assert_eq!(node.entities[1], (EntityId::new(2), 200));
        assert_eq!(node.index_of(EntityId::new(2)), Some(1));
        assert_eq!(node.index_of(EntityId::new(3)), Some(0));
        assert_eq!(node.index_of(EntityId::new(1)), None);
    }

    #[test]
    fn test_take_last() {
        let mut node = node_with(&[1, 2]);
        assert_eq!(node.take(1).0, EntityId::new(2));
        assert_eq!(node.entities, vec![(EntityId::new(1), 100)]);
    }

    #[test]
    fn test_reclaim_shrinks_sparse_lists() {
        let mut node = node_with(&[]);
        node.entities.reserve_exact(30);
        for tag in 0..30 {
            node.entities.push((EntityId::new(tag + 1), tag));
        }
        let cap = node.entities.capacity();
        while node.len() > cap / 3 + 1 {
            node.take(0);
        }
        assert_eq!(node.entities.capacity(), cap);
        node.take(0);
        // down to a third of the slots: the list was reallocated
        assert!(node.entities.capacity() < cap);
        assert_eq!(node.len(), cap / 3);
    }

    #[test]
    fn test_children_in_quadrant_order() {
        let mut node = node_with(&[]);
        node.children[Quadrant::SouthEast.index()] = Some(NodeId(4));
        node.children[Quadrant::NorthWest.index()] = Some(NodeId(2));
        assert_eq!(node.children().collect::<Vec<_>>(), vec![NodeId(2), NodeId(4)]);
        assert_eq!(node.child(Quadrant::NorthEast), None);
    }
}
