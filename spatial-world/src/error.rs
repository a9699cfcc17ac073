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
//! Error types
//!
//! Lookups that find nothing are not errors: `entity_by_id` hands its
//! visitor `None`. The variants here cover the failures that indicate a
//! logic error in the caller or the store itself.

use thiserror::Error;

/// Errors reported by the entity store
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorldError {
    /// The allocator could not find a free identifier.
    ///
    /// With a 32-bit identifier space this only happens when identifiers
    /// are leaking, so callers should treat it as fatal.
    #[error("entity id space exhausted after {attempts} attempts")]
    ExhaustedIdSpace {
        /// Number of candidates tried before giving up
        attempts: u32,
    },

    /// Internal bookkeeping disagrees with the stored data.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A configuration value could not be used.
    #[error("invalid config value {value:?} for {key}: {reason}")]
    InvalidConfig {
        /// Configuration key (environment variable name)
        key: String,
        /// The rejected raw value
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = WorldError::ExhaustedIdSpace { attempts: 12 };
        assert_eq!(err.to_string(), "entity id space exhausted after 12 attempts");

        let err = WorldError::InvalidConfig {
            key: "SPATIAL_WORLD_RADIUS".to_string(),
            value: "abc".to_string(),
            reason: "not a number".to_string(),
        };
        assert!(err.to_string().contains("SPATIAL_WORLD_RADIUS"));
        assert!(err.to_string().contains("\"abc\""));
    }
}
