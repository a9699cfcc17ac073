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
//! # Spatial World
//!
//! The in-memory entity store a real-time simulation server keeps its live
//! game objects in. Every tick the simulation inserts spawned entities,
//! runs physics and interaction passes through radius and pairwise queries,
//! and removes what was destroyed, often from inside the very traversal
//! that decided it.
//!
//! ## Features
//!
//! - **One contract, two stores**: [`World`] is implemented by
//!   [`LinearWorld`] (hash map, brute force) and [`QuadtreeWorld`]
//!   (region quadtree, pruned queries) with identical semantics
//! - **Removal during iteration**: visitors return [`Visit`] / [`PairVisit`]
//!   decisions and the store applies them without skipping or repeating
//! - **Store-assigned identifiers**: random non-zero handles, checked
//!   against the live set
//! - **Parallelization**: optional Rayon evaluation of read-only radius
//!   queries behind the `parallel` feature
//!
//! ## Example
//!
//! ```rust
//! use spatial_world::geom::Vec2;
//! use spatial_world::world::{Entity, PairVisit, QuadtreeWorld, Scan, World};
//!
//! struct Ship {
//!     position: Vec2,
//!     sensor_range: f32,
//! }
//!
//! impl Entity for Ship {
//!     fn position(&self) -> Vec2 { self.position }
//!     fn radius(&self) -> f32 { 5.0 }
//! }
//!
//! let mut world = QuadtreeWorld::new();
//! world.add_entity(Ship { position: Vec2::new(0.0, 0.0), sensor_range: 10.0 }).unwrap();
//! world.add_entity(Ship { position: Vec2::new(5.0, 0.0), sensor_range: 0.0 }).unwrap();
//! world.add_entity(Ship { position: Vec2::new(50.0, 0.0), sensor_range: 0.0 }).unwrap();
//!
//! let mut contacts = 0;
//! world.for_entities_and_others(
//!     |_, ship| Scan::Within(ship.sensor_range),
//!     |_, _, _, _| {
//!         contacts += 1;
//!         PairVisit::CONTINUE
//!     },
//! );
//! assert_eq!(contacts, 1);
//! ```

#![warn(missing_docs)]

/// Store configuration
pub mod config;

/// Error types
pub mod error;

/// 2D vectors and bounding boxes
pub mod geom;

/// The entity store contract and its implementations
pub mod world;

pub use config::WorldConfig;
pub use error::WorldError;
pub use world::{Entity, EntityId, LinearWorld, PairVisit, QuadtreeWorld, Scan, Visit, World, WorldStats};
