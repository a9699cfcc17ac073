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
//! Axis-aligned bounding boxes
//!
//! Boxes are stored by their corners rather than center and half-extent, so
//! containment and overlap reduce to plain coordinate comparisons.

use crate::geom::Vec2;

/// One of the four quadrants of a box, y pointing up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Lower x, upper y
    NorthWest,
    /// Upper x, upper y
    NorthEast,
    /// Lower x, lower y
    SouthWest,
    /// Upper x, lower y
    SouthEast,
}

impl Quadrant {
    /// All quadrants in child-slot order
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    /// Child slot index of this quadrant (0..4)
    pub fn index(self) -> usize {
        match self {
            Quadrant::NorthWest => 0,
            Quadrant::NorthEast => 1,
            Quadrant::SouthWest => 2,
            Quadrant::SouthEast => 3,
        }
    }

    fn from_sides(east: bool, north: bool) -> Self {
        match (east, north) {
            (false, true) => Quadrant::NorthWest,
            (true, true) => Quadrant::NorthEast,
            (false, false) => Quadrant::SouthWest,
            (true, false) => Quadrant::SouthEast,
        }
    }
}

/// Axis-aligned bounding box
///
/// Invariant: `min` is component-wise less than or equal to `max`.
///
/// # Examples
///
/// ```
/// use spatial_world::geom::{Aabb, Vec2};
///
/// let region = Aabb::from_center_half_extent(Vec2::zero(), 100.0);
/// let ship = Aabb::from_center_radius(Vec2::new(10.0, 10.0), 5.0);
/// assert!(region.contains(&ship));
/// assert!(region.intersects(&ship));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    min: Vec2,
    max: Vec2,
}

impl Aabb {
    /// Create a box from its minimum and maximum corners
    ///
    /// # Panics
    ///
    /// Panics if any component of `min` is greater than its counterpart in `max`.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        assert!(
            min.x() <= max.x() && min.y() <= max.y(),
            "Invalid AABB: min must not exceed max"
        );
        Aabb { min, max }
    }

    /// Box spanning `[center - radius, center + radius]` on both axes
    ///
    /// Negative radii are clamped to zero so the result is always well formed.
    pub fn from_center_radius(center: Vec2, radius: f32) -> Self {
        let r = Vec2::splat(radius.max(0.0));
        Aabb {
            min: center - r,
            max: center + r,
        }
    }

    /// Square box with the given half-width around `center`
    pub fn from_center_half_extent(center: Vec2, half_extent: f32) -> Self {
        Self::from_center_radius(center, half_extent)
    }

    /// Minimum corner
    pub fn min(&self) -> Vec2 {
        self.min
    }

    /// Maximum corner
    pub fn max(&self) -> Vec2 {
        self.max
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min.x() + self.max.x()) * 0.5,
            (self.min.y() + self.max.y()) * 0.5,
        )
    }

    /// Extent along the x axis
    pub fn width(&self) -> f32 {
        self.max.x() - self.min.x()
    }

    /// Extent along the y axis
    pub fn height(&self) -> f32 {
        self.max.y() - self.min.y()
    }

    /// Returns `true` if `point` lies inside or on the boundary
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x() >= self.min.x()
            && point.x() <= self.max.x()
            && point.y() >= self.min.y()
            && point.y() <= self.max.y()
    }

    /// Returns `true` if `other` lies entirely inside this box (inclusive)
    pub fn contains(&self, other: &Aabb) -> bool {
        other.min.x() >= self.min.x()
            && other.max.x() <= self.max.x()
            && other.min.y() >= self.min.y()
            && other.max.y() <= self.max.y()
    }

    /// Returns `true` if the boxes overlap; touching edges count as overlap
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(self.max.x() < other.min.x()
            || self.min.x() > other.max.x()
            || self.max.y() < other.min.y()
            || self.min.y() > other.max.y())
    }

    /// The sub-box covering `quadrant`
    pub fn quadrant(&self, quadrant: Quadrant) -> Aabb {
        let c = self.center();
        match quadrant {
            Quadrant::NorthWest => Aabb {
                min: Vec2::new(self.min.x(), c.y()),
                max: Vec2::new(c.x(), self.max.y()),
            },
            Quadrant::NorthEast => Aabb { min: c, max: self.max },
            Quadrant::SouthWest => Aabb { min: self.min, max: c },
            Quadrant::SouthEast => Aabb {
                min: Vec2::new(c.x(), self.min.y()),
                max: Vec2::new(self.max.x(), c.y()),
            },
        }
    }

    /// The single quadrant that fully contains `other`, if any
    ///
    /// Returns `None` when `other` straddles a center line or reaches outside
    /// this box.
    pub fn quadrant_containing(&self, other: &Aabb) -> Option<Quadrant> {
        if !self.contains(other) {
            return None;
        }
        let c = self.center();
        let east = if other.max.x() <= c.x() {
            false
        } else if other.min.x() >= c.x() {
            true
        } else {
            return None;
        };
        let north = if other.max.y() <= c.y() {
            false
        } else if other.min.y() >= c.y() {
            true
        } else {
            return None;
        };
        Some(Quadrant::from_sides(east, north))
    }
}
