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
//! Two-dimensional vector
//!
//! Positions and extents in the world are single-precision. Exact
//! cross-platform determinism is not a goal of the store, so `f32` is used
//! throughout to halve the footprint of entity positions.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// 2D vector with single-precision components
///
/// # Examples
///
/// ```
/// use spatial_world::geom::Vec2;
///
/// let a = Vec2::new(3.0, 4.0);
/// assert_eq!(a.length_squared(), 25.0);
/// assert_eq!(a.distance_squared(Vec2::zero()), 25.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    x: f32,
    y: f32,
}

impl Vec2 {
    /// Create a new vector with the given components
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    /// The zero vector (origin)
    pub const fn zero() -> Self {
        Vec2::new(0.0, 0.0)
    }

    /// A vector with both components set to `v`
    pub const fn splat(v: f32) -> Self {
        Vec2::new(v, v)
    }

    /// Get the x component
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Get the y component
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Set the x component
    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    /// Set the y component
    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    /// Squared Euclidean length
    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Squared Euclidean distance to `other`
    ///
    /// Radius queries compare against `radius²` so no square root is taken
    /// on the hot path.
    pub fn distance_squared(&self, other: Vec2) -> f32 {
        (*self - other).length_squared()
    }

    /// Check if both components are finite (not NaN or infinite)
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Get the vector as an array
    pub fn as_array(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Create a vector from an array
    pub fn from_array(arr: [f32; 2]) -> Self {
        Vec2::new(arr[0], arr[1])
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}
