//! Simulation configuration.
//!
//! Every tunable of the fireworks simulation lives in [`SimConfig`]. The
//! defaults reproduce the classic look; a `fireworks.toml` next to the binary
//! overrides any subset of them.

use std::fs;
use std::ops::Deref;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "fireworks.toml";

/// Inclusive `[min, max]` sampling range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange<T> {
    pub min: T,
    pub max: T,
}

impl<T> ValueRange<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl ValueRange<f32> {
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidRange { name, min: self.min, max: self.max });
        }
        Ok(())
    }
}

impl ValueRange<u32> {
    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidRange {
                name,
                min: self.min as f32,
                max: self.max as f32,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Window / world ===
    pub window_width: u32,
    pub window_height: u32,
    /// Visible world extent; also the launch band for rockets.
    pub world_width: f32,
    pub world_height: f32,
    pub firework_count: u32,
    /// Seconds per simulation step. `None` steps once per frame with the measured delta.
    pub fixed_timestep: Option<f32>,
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,

    // === Physics ===
    pub gravity: Vec3,
    pub rocket_velocity_x: ValueRange<f32>,
    pub rocket_velocity_y: ValueRange<f32>,
    pub explosion_speed: ValueRange<f32>,

    // === Particles ===
    pub particle_count: ValueRange<u32>,
    pub trail_count: u32,
    pub scale: ValueRange<f32>,
    pub trail_scale: f32,
    pub color_channel: ValueRange<f32>,

    // === Lifetime ===
    /// Life lost per second by every explosion particle.
    pub explosion_decay_rate: f32,
    /// Per-trail decay, sampled once when the trail is created.
    pub trail_decay_rate: ValueRange<f32>,

    // === Respawn ===
    /// Half-width of the scalar offset applied to respawned trails.
    pub jitter: f32,
    pub rocket_trail_speed: ValueRange<f32>,
    pub explosion_trail_speed: f32,

    // === Mesh ===
    /// Rim vertices of the circle fan; also the number of burst directions.
    pub arc_vertices: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            world_width: 800.0,
            world_height: 600.0,
            firework_count: 10,
            fixed_timestep: None,
            seed: None,

            gravity: Vec3::new(0.0, -200.0, 0.0),
            rocket_velocity_x: ValueRange::new(-20.0, 20.0),
            rocket_velocity_y: ValueRange::new(300.0, 500.0),
            explosion_speed: ValueRange::new(20.0, 200.0),

            particle_count: ValueRange::new(30, 49),
            trail_count: 15,
            scale: ValueRange::new(1.0, 2.0),
            trail_scale: 1.0,
            color_channel: ValueRange::new(0.25, 1.0),

            explosion_decay_rate: 0.5,
            trail_decay_rate: ValueRange::new(3.0, 6.0),

            jitter: 5.0,
            rocket_trail_speed: ValueRange::new(0.75, 1.0),
            explosion_trail_speed: 0.1,

            arc_vertices: 50,
        }
    }
}

impl SimConfig {
    /// Load from `path`. A missing file yields the defaults; an unreadable or
    /// malformed one is an error.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reject any configuration that would yield NaNs, negative lifetimes or
    /// empty particle sets at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("world_width", self.world_width)?;
        positive("world_height", self.world_height)?;
        if let Some(step) = self.fixed_timestep {
            positive("fixed_timestep", step)?;
        }

        if !self.gravity.is_finite() {
            return Err(ConfigError::InvalidRange {
                name: "gravity",
                min: self.gravity.min_element(),
                max: self.gravity.max_element(),
            });
        }
        self.rocket_velocity_x.validate("rocket_velocity_x")?;
        self.rocket_velocity_y.validate("rocket_velocity_y")?;
        self.explosion_speed.validate("explosion_speed")?;

        self.particle_count.validate("particle_count")?;
        at_least("particle_count.min", 1, self.particle_count.min)?;
        at_least("trail_count", 1, self.trail_count)?;
        self.scale.validate("scale")?;
        non_negative("scale.min", self.scale.min)?;
        positive("trail_scale", self.trail_scale)?;
        self.color_channel.validate("color_channel")?;

        positive("explosion_decay_rate", self.explosion_decay_rate)?;
        self.trail_decay_rate.validate("trail_decay_rate")?;
        positive("trail_decay_rate.min", self.trail_decay_rate.min)?;

        non_negative("jitter", self.jitter)?;
        self.rocket_trail_speed.validate("rocket_trail_speed")?;
        if !self.explosion_trail_speed.is_finite() {
            return Err(ConfigError::NotPositive {
                name: "explosion_trail_speed",
                value: self.explosion_trail_speed,
            });
        }

        at_least("arc_vertices", 3, self.arc_vertices)?;
        Ok(())
    }

    /// Run [`validate`](Self::validate) and wrap the result for the simulation.
    pub fn validated(self) -> Result<ValidConfig, ConfigError> {
        self.validate()?;
        Ok(ValidConfig(self))
    }

    /// Upper bound on simultaneously visible particles, used to size GPU buffers.
    pub fn max_instances(&self) -> usize {
        let trails = self.trail_count as usize;
        let rocket = 1 + trails;
        let burst = self.particle_count.max as usize * (1 + trails);
        self.firework_count as usize * rocket.max(burst)
    }
}

/// A [`SimConfig`] that passed validation. Only [`SimConfig::validated`]
/// builds one, so the simulation never samples from an empty or inverted range.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidConfig(SimConfig);

impl ValidConfig {
    pub fn into_inner(self) -> SimConfig {
        self.0
    }
}

impl Deref for ValidConfig {
    type Target = SimConfig;

    fn deref(&self) -> &SimConfig {
        &self.0
    }
}

impl Default for ValidConfig {
    fn default() -> Self {
        Self(SimConfig::default())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn at_least(name: &'static str, min: u32, value: u32) -> Result<(), ConfigError> {
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::TooSmall { name, min, value })
    }
}
