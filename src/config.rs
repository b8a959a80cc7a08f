use crate::algorithms::flocking::{AccelerationPolicy, SteeringParams};
use crate::error::{FlockError, FlockResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::Path;

pub const DEFAULT_POPULATION: usize = 125;
pub const DEFAULT_SEED: u64 = 0;
pub const DEFAULT_MAX_FORCE: f64 = 0.4;
pub const DEFAULT_MAX_SPEED: f64 = 0.6;
pub const DEFAULT_WIDTH: f64 = 80.0;
pub const DEFAULT_HEIGHT: f64 = 50.0;
pub const DEFAULT_DEPTH: f64 = 50.0;
pub const DEFAULT_VIEW_DISTANCE: f64 = 15.0;
pub const DEFAULT_SPAWN_SPEED: f64 = 0.1;
pub const DEFAULT_WRAP_WIDTH: f64 = 80.0;
pub const DEFAULT_WRAP_HEIGHT: f64 = 50.0;

/// Half-extents of the scene box a boid spawns into and wraps around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            depth: DEFAULT_DEPTH,
        }
    }
}

/// Per-boid kinematic limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoidParams {
    /// Cap on the acceleration magnitude after steering.
    pub max_force: f64,
    /// Cap on the velocity magnitude.
    pub max_speed: f64,
    /// Spawn extents; `depth` is also the z wrap bound.
    pub bounds: Bounds,
    /// Perception radius.
    pub view_distance: f64,
    /// Scale of the random spawn velocity.
    pub spawn_speed: f64,
}

impl Default for BoidParams {
    fn default() -> Self {
        Self {
            max_force: DEFAULT_MAX_FORCE,
            max_speed: DEFAULT_MAX_SPEED,
            bounds: Bounds::default(),
            view_distance: DEFAULT_VIEW_DISTANCE,
            spawn_speed: DEFAULT_SPAWN_SPEED,
        }
    }
}

impl BoidParams {
    /// Reject negative limits and empty extents. Field names are reported
    /// under the `boid.` prefix used in [`FlockConfig`].
    pub fn validate(&self) -> FlockResult<()> {
        non_negative("boid.max_force", self.max_force)?;
        non_negative("boid.max_speed", self.max_speed)?;
        non_negative("boid.spawn_speed", self.spawn_speed)?;
        positive("boid.view_distance", self.view_distance)?;
        positive("boid.bounds.width", self.bounds.width)?;
        positive("boid.bounds.height", self.bounds.height)?;
        positive("boid.bounds.depth", self.bounds.depth)?;
        Ok(())
    }
}

/// The x and y bounds handed to `Boid::constrain` on every update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WrapExtent {
    pub width: f64,
    pub height: f64,
}

impl Default for WrapExtent {
    fn default() -> Self {
        Self {
            width: DEFAULT_WRAP_WIDTH,
            height: DEFAULT_WRAP_HEIGHT,
        }
    }
}

/// How boids within one tick see each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateOrder {
    /// Boids update in place, in list order; later boids see this tick's
    /// state of earlier ones.
    #[default]
    Sequential,
    /// Every boid steers against the population as it was at the start of
    /// the tick.
    Snapshot,
}

impl UpdateOrder {
    pub const ALL: [UpdateOrder; 2] = [UpdateOrder::Sequential, UpdateOrder::Snapshot];

    /// Name used in config files and on the wasm boundary.
    pub fn name(self) -> &'static str {
        match self {
            UpdateOrder::Sequential => "sequential",
            UpdateOrder::Snapshot => "snapshot",
        }
    }
}

/// Everything needed to build a [`crate::Flock`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlockConfig {
    pub population: usize,
    pub seed: u64,
    pub boid: BoidParams,
    pub steering: SteeringParams,
    pub wrap: WrapExtent,
    pub update_order: UpdateOrder,
    pub acceleration: AccelerationPolicy,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            population: DEFAULT_POPULATION,
            seed: DEFAULT_SEED,
            boid: BoidParams::default(),
            steering: SteeringParams::default(),
            wrap: WrapExtent::default(),
            update_order: UpdateOrder::default(),
            acceleration: AccelerationPolicy::default(),
        }
    }
}

impl FlockConfig {
    /// Parse a JSON document and validate it. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> FlockResult<Self> {
        let config: FlockConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> FlockResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> FlockResult<()> {
        self.boid.validate()?;

        let s = &self.steering;
        non_negative("steering.base_strength", s.base_strength)?;
        non_negative("steering.separation_factor", s.separation_factor)?;
        non_negative("steering.alignment_factor", s.alignment_factor)?;
        non_negative("steering.cohesion_factor", s.cohesion_factor)?;
        finite("steering.fov", s.fov)?;
        if s.fov <= 0.0 || s.fov > PI {
            return Err(invalid("steering.fov", format!("must be in (0, π], got {}", s.fov)));
        }

        positive("wrap.width", self.wrap.width)?;
        positive("wrap.height", self.wrap.height)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> FlockError {
    FlockError::InvalidConfig { field, reason }
}

fn finite(field: &'static str, value: f64) -> FlockResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f64) -> FlockResult<()> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(invalid(field, format!("must not be negative, got {value}")));
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> FlockResult<()> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(invalid(field, format!("must be positive, got {value}")));
    }
    Ok(())
}
