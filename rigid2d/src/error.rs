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
//! The physics core never returns errors: missed collisions and degenerate
//! geometry are absorbed silently. Errors only exist at the edges, where a
//! simulation is configured or a constraint is registered.

use thiserror::Error;

/// Invalid simulation configuration, reported at construction time
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The outer timestep is zero, negative, NaN or infinite
    #[error("invalid timestep {0}: must be positive and finite")]
    InvalidTimestep(f64),

    /// At least one substep is required per tick
    #[error("substep count must be at least 1")]
    ZeroSubsteps,

    /// Gravity has a NaN or infinite component
    #[error("gravity ({0}, {1}) must be finite")]
    InvalidGravity(f64, f64),

    /// An environment override could not be parsed
    #[error("environment variable {name}={value:?} is not a valid {expected}")]
    InvalidEnvOverride {
        /// Variable name
        name: &'static str,
        /// Raw value found in the environment
        value: String,
        /// What the value should have parsed as
        expected: &'static str,
    },
}

/// Failure to register a constraint with a [`ConstraintSet`](crate::constraints::ConstraintSet)
#[derive(Debug, Error)]
pub enum ConstraintError {
    /// A constraint with the same name is already registered
    #[error("constraint '{0}' is already registered")]
    Duplicate(String),

    /// The constraint's own version or API version is not valid semver
    #[error("constraint '{name}' declares an invalid version: {source}")]
    InvalidVersion {
        /// Constraint name
        name: String,
        /// Parse failure
        #[source]
        source: semver::Error,
    },

    /// The constraint was built against an incompatible constraint API
    #[error("constraint '{name}' targets API {required}, but this engine provides {provided}")]
    IncompatibleApi {
        /// Constraint name
        name: String,
        /// API version the constraint was written against
        required: String,
        /// API version of this crate
        provided: &'static str,
    },
}
