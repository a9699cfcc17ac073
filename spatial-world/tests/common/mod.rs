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
//! Shared fixtures for integration tests

#![allow(dead_code, unused_macros)]

use spatial_world::geom::Vec2;
use spatial_world::world::{Entity, LinearWorld, QuadtreeWorld};
use spatial_world::WorldConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Test entity carrying a tag so both variants can be compared by content
#[derive(Debug)]
pub struct Body {
    pub position: Vec2,
    pub radius: f32,
    pub tag: u32,
    pub closes: Arc<AtomicUsize>,
}

impl Body {
    pub fn new(x: f32, y: f32, tag: u32) -> Self {
        Body::sized(x, y, 1.0, tag)
    }

    pub fn sized(x: f32, y: f32, radius: f32, tag: u32) -> Self {
        Body {
            position: Vec2::new(x, y),
            radius,
            tag,
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn counted(mut self, closes: &Arc<AtomicUsize>) -> Self {
        self.closes = Arc::clone(closes);
        self
    }
}

impl Entity for Body {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn config() -> WorldConfig {
    WorldConfig::new(256.0).with_seed(2025)
}

pub fn linear() -> LinearWorld<Body> {
    LinearWorld::with_config(&config())
}

pub fn quadtree() -> QuadtreeWorld<Body> {
    QuadtreeWorld::with_config(&config())
}

/// Run the same scenario against both world variants
macro_rules! for_both_worlds {
    ($($name:ident => $scenario:ident;)*) => {
        mod linear_world {
            use super::*;
            $(
                #[test]
                fn $name() {
                    super::$scenario(common::linear());
                }
            )*
        }

        mod quadtree_world {
            use super::*;
            $(
                #[test]
                fn $name() {
                    super::$scenario(common::quadtree());
                }
            )*
        }
    };
}
