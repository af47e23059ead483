//! Scenario files
//!
//! A scenario describes the universe constants, the initial bodies with any
//! pre-scheduled burns, and an optional forecast request:
//!
//! ```yaml
//! universe:
//!   g: 6.67e-11
//!   r_power: -2.0
//!   step_size: 100.0
//!   speed_up: 5000.0
//!
//! bodies:
//!   - name: earth
//!     position: [0.0, 0.0]
//!     mass: 5.97e24
//!   - name: ship
//!     position: [7.0e6, 0.0]
//!     velocity: [0.0, 7546.0]
//!     burns:
//!       - { start: 1000.0, end: 1500.0, direction: 1.0 }
//!
//! forecast:
//!   focus: ship
//!   samples: 30
//!   spacing: 1000.0
//! ```
//!
//! Every field except `bodies[].name` and `bodies[].position` has a default.

use crate::body::DEFAULT_MAX_THRUST;
use crate::diagnostics::Diagnostics;
use crate::engine::{WorldError, DEFAULT_G, DEFAULT_R_POWER};
use crate::predictor::DEFAULT_STEP_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Simulation seconds per wall-clock second
pub const DEFAULT_SPEED_UP: f64 = 5.0e3;
/// Default number of forecast samples
pub const DEFAULT_SAMPLES: usize = 30;
/// Default spacing between forecast samples, in simulation seconds
pub const DEFAULT_SPACING: f64 = 1.0e3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scenario YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("scenario rejected:\n{0}")]
    Rejected(Diagnostics),
    #[error(transparent)]
    World(#[from] WorldError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub universe: UniverseConfig,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
    #[serde(default)]
    pub forecast: Option<ForecastConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Physical constants and stepping parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UniverseConfig {
    #[serde(default = "default_g")]
    pub g: f64,
    #[serde(default = "default_r_power")]
    pub r_power: f64,
    /// Largest physics sub-step, used both live and in forecasts
    #[serde(default = "default_step_size")]
    pub step_size: f64,
    #[serde(default = "default_speed_up")]
    pub speed_up: f64,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            g: DEFAULT_G,
            r_power: DEFAULT_R_POWER,
            step_size: DEFAULT_STEP_SIZE,
            speed_up: DEFAULT_SPEED_UP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodyConfig {
    pub name: String,
    pub position: [f64; 2],
    #[serde(default)]
    pub velocity: [f64; 2],
    #[serde(default)]
    pub mass: f64,
    #[serde(default = "default_max_thrust")]
    pub max_thrust: f64,
    #[serde(default)]
    pub burns: Vec<BurnConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BurnConfig {
    /// Seconds from now until the burn starts
    pub start: f64,
    /// Seconds from now until the burn ends
    pub end: f64,
    #[serde(default = "default_direction")]
    pub direction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastConfig {
    #[serde(default)]
    pub focus: Option<String>,
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    /// Explicit sample times; overrides `samples` and `spacing`
    #[serde(default)]
    pub times: Option<Vec<f64>>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            focus: None,
            samples: DEFAULT_SAMPLES,
            spacing: DEFAULT_SPACING,
            times: None,
        }
    }
}

impl ForecastConfig {
    pub fn sample_times(&self) -> Vec<f64> {
        match &self.times {
            Some(times) => times.clone(),
            None => (0..self.samples).map(|i| i as f64 * self.spacing).collect(),
        }
    }
}

fn default_g() -> f64 {
    DEFAULT_G
}

fn default_r_power() -> f64 {
    DEFAULT_R_POWER
}

fn default_step_size() -> f64 {
    DEFAULT_STEP_SIZE
}

fn default_speed_up() -> f64 {
    DEFAULT_SPEED_UP
}

fn default_max_thrust() -> f64 {
    DEFAULT_MAX_THRUST
}

fn default_direction() -> f64 {
    1.0
}

fn default_samples() -> usize {
    DEFAULT_SAMPLES
}

fn default_spacing() -> f64 {
    DEFAULT_SPACING
}
