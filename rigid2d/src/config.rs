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
//! Simulation configuration
//!
//! Timestep, substep count and gravity are fixed when a
//! [`Simulation`](crate::Simulation) is constructed. Defaults match a 60 Hz
//! display with 8 substeps per frame under Earth gravity.
//!
//! # Environment Configuration
//!
//! [`SimulationConfig::from_env`] applies overrides on top of the defaults:
//!
//! ```bash
//! export RIGID2D_TIMESTEP=0.008333
//! export RIGID2D_SUBSTEPS=16
//! export RIGID2D_GRAVITY_X=0
//! export RIGID2D_GRAVITY_Y=-1.62
//! ```

use crate::error::ConfigError;
use glam::DVec2;
use std::str::FromStr;

/// Default outer timestep in seconds
pub const DEFAULT_TIMESTEP: f64 = 1.0 / 60.0;

/// Default number of substeps per outer tick
pub const DEFAULT_SUBSTEPS: u32 = 8;

/// Default gravity in m/s²
pub const DEFAULT_GRAVITY: DVec2 = DVec2::new(0.0, -9.8);

const ENV_TIMESTEP: &str = "RIGID2D_TIMESTEP";
const ENV_SUBSTEPS: &str = "RIGID2D_SUBSTEPS";
const ENV_GRAVITY_X: &str = "RIGID2D_GRAVITY_X";
const ENV_GRAVITY_Y: &str = "RIGID2D_GRAVITY_Y";

/// Fixed-step configuration for a simulation
///
/// # Examples
///
/// ```
/// use glam::DVec2;
/// use rigid2d::SimulationConfig;
///
/// let config = SimulationConfig::default()
///     .with_substeps(4)
///     .with_gravity(DVec2::ZERO);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.substep_dt(), config.timestep / 4.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Duration of one outer tick in seconds
    pub timestep: f64,
    /// Number of (integrate, collide) iterations per tick
    pub substeps: u32,
    /// Constant acceleration applied to every dynamic body
    pub gravity: DVec2,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            timestep: DEFAULT_TIMESTEP,
            substeps: DEFAULT_SUBSTEPS,
            gravity: DEFAULT_GRAVITY,
        }
    }
}

impl SimulationConfig {
    /// Set the outer timestep
    pub fn with_timestep(mut self, timestep: f64) -> Self {
        self.timestep = timestep;
        self
    }

    /// Set the substep count
    pub fn with_substeps(mut self, substeps: u32) -> Self {
        self.substeps = substeps;
        self
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: DVec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Timestep of a single substep
    pub fn substep_dt(&self) -> f64 {
        self.timestep / self.substeps.max(1) as f64
    }

    /// Reject configurations the driver cannot run
    ///
    /// Timesteps that are valid but numerically questionable are only
    /// reported through `log::warn!`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timestep <= 0.0 || !self.timestep.is_finite() {
            return Err(ConfigError::InvalidTimestep(self.timestep));
        }
        if self.substeps == 0 {
            return Err(ConfigError::ZeroSubsteps);
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::InvalidGravity(self.gravity.x, self.gravity.y));
        }

        let dt = self.substep_dt();
        if dt < 1e-9 {
            log::warn!(
                "substep timestep {:e} is extremely small and may lose precision",
                dt
            );
        }
        if self.timestep > 1.0 {
            log::warn!(
                "timestep {} is large; bodies may tunnel or penetrate deeply",
                self.timestep
            );
        }
        Ok(())
    }

    /// Defaults overridden by `RIGID2D_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by values from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SimulationConfig::default();
        if let Some(dt) = parse_override::<f64, _>(&lookup, ENV_TIMESTEP, "number")? {
            config.timestep = dt;
        }
        if let Some(substeps) = parse_override::<u32, _>(&lookup, ENV_SUBSTEPS, "unsigned integer")? {
            config.substeps = substeps;
        }
        if let Some(gx) = parse_override::<f64, _>(&lookup, ENV_GRAVITY_X, "number")? {
            config.gravity.x = gx;
        }
        if let Some(gy) = parse_override::<f64, _>(&lookup, ENV_GRAVITY_Y, "number")? {
            config.gravity.y = gy;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_override<T, F>(
    lookup: &F,
    name: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvOverride {
                name,
                value: raw,
                expected,
            }),
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
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.substeps, 8);
        assert!((config.substep_dt() - 1.0 / 480.0).abs() < 1e-15);
    }

    #[test]
    fn test_invalid_timestep_rejected() {
        for dt in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            let config = SimulationConfig::default().with_timestep(dt);
            assert!(matches!(config.validate(), Err(ConfigError::InvalidTimestep(_))));
        }
    }

    #[test]
    fn test_zero_substeps_rejected() {
        let config = SimulationConfig::default().with_substeps(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroSubsteps));
    }

    #[test]
    fn test_non_finite_gravity_rejected() {
        let config = SimulationConfig::default().with_gravity(DVec2::new(f64::NAN, 0.0));
        assert!(matches!(config.validate(), Err(ConfigError::InvalidGravity(..))));
    }

    #[test]
    fn test_lookup_overrides() {
        let config = SimulationConfig::from_lookup(lookup_from(&[
            ("RIGID2D_SUBSTEPS", "16"),
            ("RIGID2D_GRAVITY_Y", " -1.62 "),
        ]))
        .unwrap();
        assert_eq!(config.substeps, 16);
        assert_eq!(config.gravity, DVec2::new(0.0, -1.62));
        assert_eq!(config.timestep, DEFAULT_TIMESTEP);
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let err = SimulationConfig::from_lookup(lookup_from(&[("RIGID2D_TIMESTEP", "fast")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnvOverride { name: "RIGID2D_TIMESTEP", .. }
        ));
    }

    #[test]
    fn test_lookup_still_validates() {
        let err = SimulationConfig::from_lookup(lookup_from(&[("RIGID2D_SUBSTEPS", "0")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::ZeroSubsteps);
    }
}
