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
//! Ships and projectiles in a shared arena
//!
//! Each tick moves everything, lets ships fire, and resolves hits with an
//! interaction pass. World settings come from `SPATIAL_WORLD_*` variables;
//! set `RUST_LOG=spatial_world=debug` to watch the quadtree work.
//!
//! Run with `cargo run --example arena_tick`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spatial_world::geom::Vec2;
use spatial_world::world::{Entity, PairVisit, QuadtreeWorld, Scan, Visit, World};
use spatial_world::WorldConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

const TICKS: u32 = 40;
const SHIPS: usize = 60;
const SHOT_SPEED: f32 = 12.0;
const SHOT_LIFETIME: u32 = 25;

enum Thing {
    Ship { position: Vec2, velocity: Vec2, hull: u32 },
    Shot { position: Vec2, velocity: Vec2, ttl: u32 },
}

impl Entity for Thing {
    fn position(&self) -> Vec2 {
        match self {
            Thing::Ship { position, .. } | Thing::Shot { position, .. } => *position,
        }
    }

    fn radius(&self) -> f32 {
        match self {
            Thing::Ship { .. } => 6.0,
            Thing::Shot { .. } => 0.5,
        }
    }
}

fn random_direction(rng: &mut StdRng) -> Vec2 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    Vec2::new(angle.cos(), angle.sin())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("arena_tick=info".parse()?))
        .init();

    let config = WorldConfig::from_env()?;
    let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or(1));
    let mut world = QuadtreeWorld::with_config(&config);
    let edge = config.radius * 0.8;

    for _ in 0..SHIPS {
        let position = Vec2::new(rng.gen_range(-edge..edge), rng.gen_range(-edge..edge));
        let velocity = random_direction(&mut rng) * 2.0;
        world.add_entity(Thing::Ship { position, velocity, hull: 3 })?;
    }

    for tick in 0..TICKS {
        let mut launches = Vec::new();
        world.for_entities(|_, thing| match thing {
            Thing::Ship { position, velocity, .. } => {
                *position += *velocity;
                if position.x().abs() > edge {
                    velocity.set_x(-velocity.x());
                }
                if position.y().abs() > edge {
                    velocity.set_y(-velocity.y());
                }
                launches.push(*position);
                Visit::Continue
            }
            Thing::Shot { position, velocity, ttl } => {
                *position += *velocity;
                *ttl -= 1;
                Visit::from_flags(false, *ttl == 0)
            }
        });

        for origin in launches {
            if rng.gen_bool(0.2) {
                let velocity = random_direction(&mut rng) * SHOT_SPEED;
                // spawn clear of the firing ship's own hull
                let position = origin + velocity;
                world.add_entity(Thing::Shot { position, velocity, ttl: SHOT_LIFETIME })?;
            }
        }

        let mut hits = 0;
        let mut sunk = 0;
        world.for_entities_and_others(
            |_, thing| match thing {
                Thing::Shot { .. } => Scan::Within(6.5),
                Thing::Ship { .. } => Scan::Skip,
            },
            |_, _, _, other| match other {
                Thing::Ship { hull, .. } => {
                    hits += 1;
                    *hull = hull.saturating_sub(1);
                    if *hull == 0 {
                        sunk += 1;
                        PairVisit::remove_both()
                    } else {
                        PairVisit::remove_primary()
                    }
                }
                Thing::Shot { .. } => PairVisit::CONTINUE,
            },
        );

        if tick % 10 == 0 || tick + 1 == TICKS {
            let stats = world.debug();
            info!(tick, hits, sunk, %stats, "tick complete");
        }
    }

    let mut ships = 0;
    world.for_entities(|_, thing| {
        if matches!(thing, Thing::Ship { .. }) {
            ships += 1;
        }
        Visit::Continue
    });
    info!(ships, remaining = world.count(), "arena finished");
    world.check_invariants()?;
    Ok(())
}
