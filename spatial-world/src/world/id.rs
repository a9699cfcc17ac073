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
//! Identifier allocation
//!
//! Identifiers are drawn at random from the non-zero 32-bit range and
//! checked against a liveness predicate supplied by the store. Random
//! draws keep handles unpredictable to clients and make collisions rare
//! until the world holds a meaningful fraction of four billion entities.

use crate::error::WorldError;
use crate::world::EntityId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Produces identifiers not currently in use
///
/// The allocator keeps no record of what it handed out. The caller makes an
/// identifier "used" by inserting an entity under it.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    rng: StdRng,
    max_attempts: u32,
}

impl IdAllocator {
    /// Create an allocator seeded from the operating system
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is zero.
    pub fn new(max_attempts: u32) -> Self {
        Self::with_rng(StdRng::from_entropy(), max_attempts)
    }

    /// Create an allocator with a fixed seed for reproducible identifiers
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is zero.
    pub fn seeded(seed: u64, max_attempts: u32) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), max_attempts)
    }

    fn with_rng(rng: StdRng, max_attempts: u32) -> Self {
        assert!(max_attempts > 0, "Allocator needs at least one attempt");
        IdAllocator { rng, max_attempts }
    }

    /// Build an allocator from an optional seed
    pub fn from_seed(seed: Option<u64>, max_attempts: u32) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed, max_attempts),
            None => Self::new(max_attempts),
        }
    }

    /// Return an identifier `is_in_use` reports as free
    ///
    /// Never returns [`EntityId::INVALID`].
    ///
    /// # Errors
    ///
    /// [`WorldError::ExhaustedIdSpace`] if every candidate drawn within the
    /// retry bound was in use.
    pub fn allocate<F>(&mut self, is_in_use: F) -> Result<EntityId, WorldError>
    where
        F: Fn(EntityId) -> bool,
    {
        for attempt in 0..self.max_attempts {
            let candidate = EntityId::new(self.rng.gen_range(1..=u32::MAX));
            if !is_in_use(candidate) {
                return Ok(candidate);
            }
            trace!(attempt, %candidate, "entity id collision, retrying");
        }
        Err(WorldError::ExhaustedIdSpace {
            attempts: self.max_attempts,
        })
    }

    /// Maximum number of candidates tried per allocation
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
