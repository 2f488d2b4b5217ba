//! Tunables for a simulation run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Simulation parameters, loadable from TOML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the world's random source.
    pub seed: u64,
    /// Maximum number of live pooled entities.
    pub pool_capacity: usize,
    /// Charge ticks required to reach full charge.
    pub max_charge: u32,
    /// Controllers spawned per weapon activation.
    pub controllers_per_weapon: usize,
    /// Beams held by each controller while charging.
    pub beams_per_controller: usize,
    /// Beams held by each controller once fully charged and focused.
    pub focused_beam_count: usize,
    /// Upper bound on beam length in world units.
    pub max_beam_length: f32,
    /// Fraction of the remaining aim error removed each tick.
    pub aim_responsiveness: f32,
    /// Orbit radius reached once a controller's orbit has fully expanded.
    pub orbit_max_distance: f32,
    /// Cursor distance from the actor under which the cursor snaps to the actor.
    pub cursor_dead_zone: f32,
    /// Distance from the actor under which absorbed projectiles are hijacked instead of eroded.
    pub hijack_radius: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_0f_1197,
            pool_capacity: 1000,
            max_charge: 240,
            controllers_per_weapon: 5,
            beams_per_controller: 6,
            focused_beam_count: 4,
            max_beam_length: 4096.0,
            aim_responsiveness: 0.12,
            orbit_max_distance: 120.0,
            cursor_dead_zone: 80.0,
            hijack_radius: 144.0,
        }
    }
}

/// Reasons a [`SimConfig`] cannot drive a simulation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The entity pool cannot hold anything.
    #[error("pool capacity must be positive")]
    ZeroPoolCapacity,
    /// A weapon would never spawn a controller.
    #[error("controllers per weapon must be positive")]
    ZeroControllers,
    /// A controller would never hold a beam.
    #[error("beams per controller must be positive")]
    ZeroBeams,
    /// The focused beam count is zero or exceeds the charging beam count.
    #[error("focused beam count {focused} must be between 1 and {beams}")]
    FocusedCountOutOfRange {
        /// Configured focused count.
        focused: usize,
        /// Configured charging count.
        beams: usize,
    },
    /// Charge could never complete.
    #[error("max charge must be positive")]
    ZeroMaxCharge,
    /// Beams could never extend.
    #[error("max beam length must be positive and finite, got {0}")]
    InvalidBeamLength(f32),
    /// Aim would never move or would overshoot.
    #[error("aim responsiveness must lie in (0, 1], got {0}")]
    InvalidResponsiveness(f32),
}

impl SimConfig {
    /// Checks that every parameter lies in its usable range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_capacity == 0 {
            return Err(ConfigError::ZeroPoolCapacity);
        }
        if self.controllers_per_weapon == 0 {
            return Err(ConfigError::ZeroControllers);
        }
        if self.beams_per_controller == 0 {
            return Err(ConfigError::ZeroBeams);
        }
        if self.focused_beam_count == 0 || self.focused_beam_count > self.beams_per_controller {
            return Err(ConfigError::FocusedCountOutOfRange {
                focused: self.focused_beam_count,
                beams: self.beams_per_controller,
            });
        }
        if self.max_charge == 0 {
            return Err(ConfigError::ZeroMaxCharge);
        }
        if !(self.max_beam_length.is_finite() && self.max_beam_length > 0.0) {
            return Err(ConfigError::InvalidBeamLength(self.max_beam_length));
        }
        if !(self.aim_responsiveness > 0.0 && self.aim_responsiveness <= 1.0) {
            return Err(ConfigError::InvalidResponsiveness(self.aim_responsiveness));
        }
        Ok(())
    }
}
