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
//! Quadtree behavior observable through the public surface

mod common;

use common::Body;
use spatial_world::geom::Vec2;
use spatial_world::world::{EntityId, PairVisit, QuadtreeWorld, Scan, Visit, World};
use spatial_world::WorldConfig;
use std::collections::HashSet;

fn tree(radius: f32, capacity: usize) -> QuadtreeWorld<Body> {
    QuadtreeWorld::with_config(
        &WorldConfig::new(radius)
            .with_node_capacity(capacity)
            .with_seed(77),
    )
}

fn position_of(world: &mut QuadtreeWorld<Body>, id: EntityId) -> Option<Vec2> {
    let mut found = None;
    world.entity_by_id(id, |body| {
        found = body.map(|b| b.position);
        false
    });
    found
}

#[test]
fn entities_in_every_quadrant_are_visited_once() {
    let mut world = tree(100.0, 8);
    let spots = [
        (-50.0, 50.0),
        (50.0, 50.0),
        (-50.0, -50.0),
        (50.0, -50.0),
        (-25.0, 75.0),
        (75.0, 25.0),
        (-75.0, -25.0),
        (25.0, -75.0),
        (60.0, 60.0),
    ];
    let ids: HashSet<EntityId> = spots
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| world.add_entity(Body::new(x, y, i as u32)).unwrap())
        .collect();

    let stats = world.debug();
    assert_eq!(stats.nodes, 5);
    assert_eq!(stats.depth, 1);

    let mut seen = HashSet::new();
    world.for_entities(|id, _| {
        assert!(seen.insert(id), "{} visited twice", id);
        Visit::Continue
    });
    assert_eq!(seen, ids);
    world.check_invariants().unwrap();
}

#[test]
fn removing_first_of_three_keeps_the_others_reachable() {
    let mut world = tree(100.0, 8);
    // on the center line, so all three share the root list
    let first = world.add_entity(Body::new(0.0, -10.0, 0)).unwrap();
    let second = world.add_entity(Body::new(0.0, 0.0, 1)).unwrap();
    let third = world.add_entity(Body::new(0.0, 10.0, 2)).unwrap();
    assert_eq!(world.node_count(), 1);

    assert!(world.remove(first));
    assert_eq!(position_of(&mut world, second), Some(Vec2::new(0.0, 0.0)));
    assert_eq!(position_of(&mut world, third), Some(Vec2::new(0.0, 10.0)));
    assert_eq!(position_of(&mut world, first), None);
    world.check_invariants().unwrap();
}

#[test]
fn removing_first_visited_during_iteration_visits_the_swapped_entity() {
    let mut world = tree(100.0, 8);
    for tag in 0..3 {
        world.add_entity(Body::new(0.0, tag as f32 * 10.0, tag)).unwrap();
    }
    let mut visited = Vec::new();
    world.for_entities(|_, body| {
        visited.push(body.tag);
        Visit::from_flags(false, visited.len() == 1)
    });
    visited.sort_unstable();
    assert_eq!(visited, vec![0, 1, 2]);
    assert_eq!(world.count(), 2);
    world.check_invariants().unwrap();
}

#[test]
fn clustered_entities_deepen_the_tree() {
    let mut world = tree(1024.0, 4);
    for tag in 0..64 {
        let x = 500.0 + (tag % 8) as f32 * 0.5;
        let y = 500.0 + (tag / 8) as f32 * 0.5;
        world.add_entity(Body::sized(x, y, 0.1, tag)).unwrap();
    }
    let stats = world.debug();
    assert!(stats.depth >= 5, "depth {}", stats.depth);
    assert_eq!(stats.entities, 64);

    let mut hits = 0;
    world.for_entities_in_radius(Vec2::new(501.0, 501.0), 0.75, |_, _, _| {
        hits += 1;
        false
    });
    // (500.5..501.5) x (500.5..501.5) grid points within 0.75
    assert_eq!(hits, 9);
    world.check_invariants().unwrap();
}

#[test]
fn depth_limit_caps_subdivision() {
    let mut world = QuadtreeWorld::with_config(
        &WorldConfig::new(100.0)
            .with_node_capacity(1)
            .with_max_depth(3)
            .with_seed(3),
    );
    for tag in 0..20 {
        world.add_entity(Body::sized(40.0, 40.0, 0.0, tag)).unwrap();
    }
    assert_eq!(world.debug().depth, 3);
    assert_eq!(world.count(), 20);
    world.check_invariants().unwrap();
}

#[test]
fn entities_crossing_quadrants_are_moved() {
    let mut world = tree(100.0, 2);
    let mut ids = Vec::new();
    for tag in 0..12 {
        let x = -80.0 + tag as f32 * 3.0;
        ids.push(world.add_entity(Body::new(x, 70.0, tag)).unwrap());
    }
    // mirror everything into the opposite quadrant
    world.for_entities(|_, body| {
        body.position = -body.position;
        Visit::Continue
    });
    world.check_invariants().unwrap();

    let mut hits = Vec::new();
    world.for_entities_in_radius(Vec2::new(80.0, -70.0), 0.5, |_, id, _| {
        hits.push(id);
        false
    });
    assert_eq!(hits, vec![ids[0]]);
}

#[test]
fn interaction_pass_across_node_boundaries() {
    let mut world = tree(100.0, 2);
    // neighbors on both sides of the vertical center line
    let left = world.add_entity(Body::new(-2.0, 30.0, 1)).unwrap();
    let right = world.add_entity(Body::new(2.0, 30.0, 2)).unwrap();
    for tag in 3..20 {
        world
            .add_entity(Body::new(-90.0 + tag as f32 * 9.0, -60.0, tag))
            .unwrap();
    }

    let mut pairs = HashSet::new();
    world.for_entities_and_others(
        |_, body| {
            if body.tag <= 2 {
                Scan::Within(5.0)
            } else {
                Scan::Skip
            }
        },
        |id, _, other, _| {
            pairs.insert((id, other));
            PairVisit::CONTINUE
        },
    );
    assert_eq!(pairs, HashSet::from([(left, right), (right, left)]));
}

#[test]
fn resize_re_roots_the_tree() {
    let mut world = tree(64.0, 2);
    for tag in 0..30 {
        let angle = tag as f32 * 0.4;
        let r = 10.0 + tag as f32 * 3.0;
        world
            .add_entity(Body::new(angle.cos() * r, angle.sin() * r, tag))
            .unwrap();
    }
    world.check_invariants().unwrap();

    world.resize(256.0);
    let stats = world.debug();
    assert_eq!(stats.radius, 256.0);
    assert_eq!(stats.entities, 30);
    world.check_invariants().unwrap();
}

/// Nine bodies far away in the south-east so the root splits
fn split_root(world: &mut QuadtreeWorld<Body>) {
    for tag in 100..109 {
        world
            .add_entity(Body::new(150.0 + (tag - 100) as f32 * 10.0, -150.0, tag))
            .unwrap();
    }
    assert!(world.node_count() > 1);
}

#[test]
fn entity_moved_by_its_primary_visit_is_found_by_later_scans() {
    let mut world = tree(256.0, 8);
    split_root(&mut world);
    let mover = world.add_entity(Body::new(-100.0, 100.0, 1)).unwrap();
    let seeker = world.add_entity(Body::new(-100.0, -100.0, 2)).unwrap();

    // the north-west child is visited before the south-west one
    let mut pairs = Vec::new();
    world.for_entities_and_others(
        |_, body| match body.tag {
            1 => {
                body.position = Vec2::new(-100.0, -99.0);
                Scan::Skip
            }
            2 => Scan::Within(5.0),
            _ => Scan::Skip,
        },
        |id, _, other, _| {
            pairs.push((id, other));
            PairVisit::CONTINUE
        },
    );
    assert_eq!(pairs, vec![(seeker, mover)]);
    world.check_invariants().unwrap();
}

#[test]
fn entity_moved_by_a_secondary_visit_is_found_by_later_scans() {
    let mut world = tree(256.0, 8);
    split_root(&mut world);
    let hunter = world.add_entity(Body::new(-100.0, 100.0, 1)).unwrap();
    let target = world.add_entity(Body::new(-102.0, 100.0, 2)).unwrap();
    let watcher = world.add_entity(Body::new(100.0, -100.0, 3)).unwrap();

    let mut pairs = HashSet::new();
    world.for_entities_and_others(
        |_, body| match body.tag {
            1 | 3 => Scan::Within(5.0),
            _ => Scan::Skip,
        },
        |id, _, other_id, other| {
            if id == hunter {
                // knock the target across the map, next to the watcher
                other.position = Vec2::new(101.0, -100.0);
            }
            pairs.insert((id, other_id));
            PairVisit::CONTINUE
        },
    );
    assert_eq!(pairs, HashSet::from([(hunter, target), (watcher, target)]));
    world.check_invariants().unwrap();
}
