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
//! World configuration
//!
//! Both store variants are built from a [`WorldConfig`]. Defaults suit a
//! game arena of a couple thousand units across; every field can be
//! overridden with builder methods or from the environment.
//!
//! # Environment Configuration
//!
//! [`WorldConfig::from_env`] reads the following variables:
//! ```bash
//! export SPATIAL_WORLD_RADIUS=2048
//! export SPATIAL_WORLD_NODE_CAPACITY=8
//! export SPATIAL_WORLD_MAX_DEPTH=16
//! export SPATIAL_WORLD_SEED=42
//! export SPATIAL_WORLD_PARALLEL=true
//! ```

use crate::error::WorldError;
use std::str::FromStr;
use tracing::debug;

/// Default half-width of the world region
pub const DEFAULT_RADIUS: f32 = 1024.0;

/// Default number of entities a quadtree node holds before it subdivides
pub const DEFAULT_NODE_CAPACITY: usize = 8;

/// Default depth below which quadtree nodes never subdivide
pub const DEFAULT_MAX_DEPTH: u32 = 16;

/// Default number of identifier candidates tried before giving up
pub const DEFAULT_MAX_ID_ATTEMPTS: u32 = 1024;

/// Configuration shared by both world variants
#[derive(Debug, Clone, PartialEq)]
pub struct WorldConfig {
    /// Half-width of the square world region centered on the origin
    pub radius: f32,
    /// Subdivision threshold for quadtree nodes
    pub node_capacity: usize,
    /// Maximum quadtree depth (root is depth 0)
    pub max_depth: u32,
    /// Allocator retry bound
    pub max_id_attempts: u32,
    /// Seed for identifier allocation; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Whether read-only queries start in parallel mode
    pub parallel: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            radius: DEFAULT_RADIUS,
            node_capacity: DEFAULT_NODE_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
            max_id_attempts: DEFAULT_MAX_ID_ATTEMPTS,
            seed: None,
            parallel: false,
        }
    }
}

impl WorldConfig {
    /// Create a configuration for a world of the given half-width
    ///
    /// # Panics
    ///
    /// Panics if `radius` is negative or not finite.
    pub fn new(radius: f32) -> Self {
        WorldConfig::default().with_radius(radius)
    }

    /// Set the world half-width
    ///
    /// # Panics
    ///
    /// Panics if `radius` is negative or not finite.
    pub fn with_radius(mut self, radius: f32) -> Self {
        assert!(
            radius >= 0.0 && radius.is_finite(),
            "World radius must be non-negative and finite"
        );
        self.radius = radius;
        self
    }

    /// Set the quadtree subdivision threshold
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_node_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Node capacity must be at least 1");
        self.node_capacity = capacity;
        self
    }

    /// Set the maximum quadtree depth
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the allocator retry bound
    ///
    /// # Panics
    ///
    /// Panics if `attempts` is zero.
    pub fn with_max_id_attempts(mut self, attempts: u32) -> Self {
        assert!(attempts > 0, "Allocator needs at least one attempt");
        self.max_id_attempts = attempts;
        self
    }

    /// Use a fixed seed for identifier allocation
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Start in parallel query mode
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Build a configuration from the process environment
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, WorldError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    ///
    /// Used by [`WorldConfig::from_env`]; handy for tests and for callers
    /// that keep settings somewhere other than the environment.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, WorldError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut config = WorldConfig::default();

        if let Some(radius) = parse_var::<f32, _>(&lookup, "SPATIAL_WORLD_RADIUS")? {
            if !(radius >= 0.0 && radius.is_finite()) {
                return Err(invalid("SPATIAL_WORLD_RADIUS", radius, "must be non-negative and finite"));
            }
            config.radius = radius;
        }
        if let Some(capacity) = parse_var::<usize, _>(&lookup, "SPATIAL_WORLD_NODE_CAPACITY")? {
            if capacity == 0 {
                return Err(invalid("SPATIAL_WORLD_NODE_CAPACITY", capacity, "must be at least 1"));
            }
            config.node_capacity = capacity;
        }
        if let Some(depth) = parse_var(&lookup, "SPATIAL_WORLD_MAX_DEPTH")? {
            config.max_depth = depth;
        }
        if let Some(seed) = parse_var(&lookup, "SPATIAL_WORLD_SEED")? {
            config.seed = Some(seed);
        }
        if let Some(parallel) = parse_var(&lookup, "SPATIAL_WORLD_PARALLEL")? {
            config.parallel = parallel;
        }

        debug!(?config, "loaded world configuration");
        Ok(config)
    }
}

fn parse_var<T, L>(lookup: &L, key: &str) -> Result<Option<T>, WorldError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    L: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| WorldError::InvalidConfig {
            key: key.to_string(),
            value: raw,
            reason: e.to_string(),
        }),
    }
}

fn invalid(key: &str, value: impl ToString, reason: &str) -> WorldError {
    WorldError::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = WorldConfig::default();
        assert_eq!(config.radius, DEFAULT_RADIUS);
        assert_eq!(config.node_capacity, 8);
        assert_eq!(config.seed, None);
        assert!(!config.parallel);
    }

    #[test]
    fn test_builder() {
        let config = WorldConfig::new(500.0)
            .with_node_capacity(4)
            .with_max_depth(3)
            .with_seed(7)
            .with_parallel(true);
        assert_eq!(config.radius, 500.0);
        assert_eq!(config.node_capacity, 4);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.seed, Some(7));
        assert!(config.parallel);
    }

    #[test]
    #[should_panic(expected = "World radius must be non-negative and finite")]
    fn test_negative_radius_panics() {
        WorldConfig::new(-1.0);
    }

    #[test]
    #[should_panic(expected = "Node capacity must be at least 1")]
    fn test_zero_capacity_panics() {
        WorldConfig::default().with_node_capacity(0);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = WorldConfig::from_lookup(lookup_from(&[
            ("SPATIAL_WORLD_RADIUS", "2048"),
            ("SPATIAL_WORLD_NODE_CAPACITY", " 16 "),
            ("SPATIAL_WORLD_SEED", "99"),
            ("SPATIAL_WORLD_PARALLEL", "true"),
        ]))
        .unwrap();
        assert_eq!(config.radius, 2048.0);
        assert_eq!(config.node_capacity, 16);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.seed, Some(99));
        assert!(config.parallel);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = WorldConfig::from_lookup(lookup_from(&[("SPATIAL_WORLD_RADIUS", "wide")]))
            .unwrap_err();
        match err {
            WorldError::InvalidConfig { key, value, .. } => {
                assert_eq!(key, "SPATIAL_WORLD_RADIUS");
                assert_eq!(value, "wide");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_lookup_rejects_out_of_range() {
        assert!(WorldConfig::from_lookup(lookup_from(&[("SPATIAL_WORLD_RADIUS", "-5")])).is_err());
        assert!(WorldConfig::from_lookup(lookup_from(&[("SPATIAL_WORLD_NODE_CAPACITY", "0")])).is_err());
    }
}
