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
//! Visitor decisions
//!
//! Iteration is driven by the store. Visitors return one of these values
//! per element and the traversal applies removal and early exit itself, so
//! callers never touch store internals while a traversal is running.

/// Decision returned for each entity visited by `for_entities`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visit {
    /// Keep the entity and move on
    #[default]
    Continue,
    /// Keep the entity and end the traversal
    Stop,
    /// Remove the entity and move on
    Remove,
    /// Remove the entity and end the traversal
    RemoveAndStop,
}

impl Visit {
    /// Build a decision from separate flags
    pub fn from_flags(stop: bool, remove: bool) -> Self {
        match (stop, remove) {
            (false, false) => Visit::Continue,
            (true, false) => Visit::Stop,
            (false, true) => Visit::Remove,
            (true, true) => Visit::RemoveAndStop,
        }
    }

    /// Whether the visited entity should be removed
    pub fn should_remove(self) -> bool {
        matches!(self, Visit::Remove | Visit::RemoveAndStop)
    }

    /// Whether the traversal should end after this entity
    pub fn should_stop(self) -> bool {
        matches!(self, Visit::Stop | Visit::RemoveAndStop)
    }
}

/// Decision returned by the primary visitor of `for_entities_and_others`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scan {
    /// End the whole traversal
    Stop,
    /// Do not look for neighbors of this entity
    Skip,
    /// Visit every other entity within this distance
    Within(f32),
}

impl Scan {
    /// Interaction radius if this decision requests a neighbor scan
    ///
    /// Non-positive and NaN radii mean "skip". An infinite radius reaches
    /// every other entity.
    pub fn radius(self) -> Option<f32> {
        match self {
            Scan::Within(r) if r > 0.0 => Some(r),
            _ => None,
        }
    }
}

/// Decision returned by the secondary visitor of `for_entities_and_others`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PairVisit {
    /// End the whole traversal after this pair
    pub stop: bool,
    /// Remove the primary entity; its neighbor scan ends immediately
    pub remove_primary: bool,
    /// Remove the other entity
    pub remove_other: bool,
}

impl PairVisit {
    /// Keep both entities and continue
    pub const CONTINUE: PairVisit = PairVisit {
        stop: false,
        remove_primary: false,
        remove_other: false,
    };

    /// Keep both entities and end the traversal
    pub fn stop() -> Self {
        PairVisit {
            stop: true,
            ..Self::CONTINUE
        }
    }

    /// Remove the primary entity
    pub fn remove_primary() -> Self {
        PairVisit {
            remove_primary: true,
            ..Self::CONTINUE
        }
    }

    /// Remove the other entity
    pub fn remove_other() -> Self {
        PairVisit {
            remove_other: true,
            ..Self::CONTINUE
        }
    }

    /// Remove both entities (e.g. a projectile and the target it destroyed)
    pub fn remove_both() -> Self {
        PairVisit {
            remove_primary: true,
            remove_other: true,
            ..Self::CONTINUE
        }
    }

    /// Also end the traversal
    pub fn and_stop(mut self) -> Self {
        self.stop = true;
        self
    }
}
