use crate::boid::Boid;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const DEFAULT_BASE_STRENGTH: f64 = 0.006;
pub const DEFAULT_SEPARATION_FACTOR: f64 = 0.2;
pub const DEFAULT_ALIGNMENT_FACTOR: f64 = 4.0;
pub const DEFAULT_COHESION_FACTOR: f64 = 3.0;
pub const DEFAULT_FOV: f64 = 0.8 * PI;

/// Weights and perception cone used by one boid update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SteeringParams {
    /// Shared scale of all three rules.
    pub base_strength: f64,
    /// Separation weight as a multiple of `base_strength`.
    pub separation_factor: f64,
    /// Alignment weight as a multiple of `base_strength`.
    pub alignment_factor: f64,
    /// Cohesion weight as a multiple of `base_strength`.
    pub cohesion_factor: f64,
    /// Half-angle (radians) of the perception cone around the velocity.
    pub fov: f64,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            base_strength: DEFAULT_BASE_STRENGTH,
            separation_factor: DEFAULT_SEPARATION_FACTOR,
            alignment_factor: DEFAULT_ALIGNMENT_FACTOR,
            cohesion_factor: DEFAULT_COHESION_FACTOR,
            fov: DEFAULT_FOV,
        }
    }
}

impl SteeringParams {
    pub fn separation_strength(&self) -> f64 {
        self.separation_factor * self.base_strength
    }

    pub fn alignment_strength(&self) -> f64 {
        self.alignment_factor * self.base_strength
    }

    pub fn cohesion_strength(&self) -> f64 {
        self.cohesion_factor * self.base_strength
    }
}

/// What happens to the previous tick's acceleration before steering runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccelerationPolicy {
    /// Rules add on top of the clamped acceleration left from the last tick.
    #[default]
    Carry,
    /// The accumulator starts from zero every tick.
    Reset,
}

impl AccelerationPolicy {
    pub fn initial(self, previous: Vector3<f64>) -> Vector3<f64> {
        match self {
            AccelerationPolicy::Carry => previous,
            AccelerationPolicy::Reset => Vector3::zeros(),
        }
    }
}

/// Run separation, alignment and cohesion, in that order, over `neighbors`
/// and return the resulting accumulator.
pub fn steer(
    boid: &Boid,
    neighbors: &[&Boid],
    params: &SteeringParams,
    policy: AccelerationPolicy,
) -> Vector3<f64> {
    let acc = policy.initial(boid.acceleration());
    let acc = boid.separate(neighbors, params.separation_strength(), acc);
    let acc = boid.align(neighbors, params.alignment_strength(), acc);
    boid.cohese(neighbors, params.cohesion_strength(), acc)
}
