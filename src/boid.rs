use crate::algorithms::flocking::{steer, AccelerationPolicy, SteeringParams};
use crate::config::{BoidParams, WrapExtent};
use crate::math::{angle_to, clamp_length, facing, scale_by_proximity, wrap_coordinate};
use nalgebra::{UnitQuaternion, Vector3};
use rand::Rng;
use std::ptr;

/// One flocking agent.
///
/// The renderer reads `position()` and `orientation()`; everything else is
/// simulation state. Orientation is derived from the acceleration on every
/// `integrate()` and never feeds back into the simulation.
#[derive(Debug, Clone)]
pub struct Boid {
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    acceleration: Vector3<f64>,
    orientation: UnitQuaternion<f64>,
    params: BoidParams,
}

impl Boid {
    /// Boid at an exact state, with zero acceleration.
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>, params: BoidParams) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
            params,
        }
    }

    /// Spawn with each position component in `[-0.5, 1.5) * extent` and each
    /// velocity component in `[-0.5, 1.5) * spawn_speed`.
    pub fn random<R: Rng + ?Sized>(params: &BoidParams, rng: &mut R) -> Self {
        let mut spread = |extent: f64| (rng.random::<f64>() * 2.0 - 0.5) * extent;
        let b = params.bounds;
        let position = Vector3::new(spread(b.width), spread(b.height), spread(b.depth));
        let s = params.spawn_speed;
        let velocity = Vector3::new(spread(s), spread(s), spread(s));
        Self::new(position, velocity, params.clone())
    }

    pub fn position(&self) -> Vector3<f64> { self.position }

    pub fn velocity(&self) -> Vector3<f64> { self.velocity }

    pub fn acceleration(&self) -> Vector3<f64> { self.acceleration }

    pub fn orientation(&self) -> UnitQuaternion<f64> { self.orientation }

    pub fn params(&self) -> &BoidParams { &self.params }

    pub fn set_position(&mut self, position: Vector3<f64>) { self.position = position; }

    pub fn set_velocity(&mut self, velocity: Vector3<f64>) { self.velocity = velocity; }

    pub fn set_acceleration(&mut self, acceleration: Vector3<f64>) {
        self.acceleration = acceleration;
    }

    /// Unit look direction of the rendered body, or zero while the boid has
    /// no acceleration.
    pub fn heading(&self) -> Vector3<f64> {
        if self.acceleration.norm_squared() == 0.0 {
            return Vector3::zeros();
        }
        self.orientation * Vector3::z()
    }

    /// Whether `other` is inside the perception sphere and the view cone.
    pub fn perceives(&self, other: &Boid, fov: f64) -> bool {
        let to_other = other.position - self.position;
        to_other.norm() < self.params.view_distance && angle_to(&self.velocity, &to_other) < fov
    }

    /// Every boid of `population` this one perceives, in input order. The
    /// boid itself is skipped by identity, so the full population may be
    /// passed in.
    pub fn neighbors<'a, I>(&self, population: I, fov: f64) -> Vec<&'a Boid>
    where
        I: IntoIterator<Item = &'a Boid>,
    {
        population
            .into_iter()
            .filter(|other| !ptr::eq(self, *other) && self.perceives(other, fov))
            .collect()
    }

    /// Push away from each neighbor, weighted by `view_distance / distance`.
    /// The sum is not averaged.
    pub fn separate(&self, neighbors: &[&Boid], strength: f64, acc: Vector3<f64>) -> Vector3<f64> {
        if neighbors.is_empty() {
            return acc;
        }
        let steering: Vector3<f64> = neighbors
            .iter()
            .map(|other| {
                let diff = self.position - other.position;
                scale_by_proximity(diff, diff.norm(), self.params.view_distance)
            })
            .sum();
        acc + steering * strength
    }

    /// Steer toward the proximity-weighted mean velocity of the neighbors.
    pub fn align(&self, neighbors: &[&Boid], strength: f64, acc: Vector3<f64>) -> Vector3<f64> {
        if neighbors.is_empty() {
            return acc;
        }
        let sum: Vector3<f64> = neighbors
            .iter()
            .map(|other| {
                let distance = (other.position - self.position).norm();
                scale_by_proximity(other.velocity, distance, self.params.view_distance)
            })
            .sum();
        acc + sum / neighbors.len() as f64 * strength
    }

    /// Steer toward the centroid of the neighbors.
    pub fn cohese(&self, neighbors: &[&Boid], strength: f64, acc: Vector3<f64>) -> Vector3<f64> {
        if neighbors.is_empty() {
            return acc;
        }
        let centroid = neighbors.iter().map(|other| other.position).sum::<Vector3<f64>>()
            / neighbors.len() as f64;
        acc + (centroid - self.position) * strength
    }

    /// One full update against `others`: perceive, steer, integrate, wrap.
    ///
    /// A copy of this boid inside `others` is not recognised by identity;
    /// pass its index as `skip` so it is left out. Inside a [`crate::Flock`]
    /// the same steps run with the population borrowed in place.
    pub fn update(
        &mut self,
        others: &[Boid],
        skip: Option<usize>,
        steering: &SteeringParams,
        wrap: &WrapExtent,
        policy: AccelerationPolicy,
    ) {
        let candidates = others
            .iter()
            .enumerate()
            .filter(|&(j, _)| Some(j) != skip)
            .map(|(_, other)| other);
        let neighbors = self.neighbors(candidates, steering.fov);
        let acc = steer(self, &neighbors, steering, policy);
        self.apply(acc, wrap);
    }

    /// Install the steered acceleration, integrate and wrap.
    pub(crate) fn apply(&mut self, acceleration: Vector3<f64>, wrap: &WrapExtent) {
        self.acceleration = acceleration;
        self.integrate();
        self.constrain(wrap.width, wrap.height);
    }

    /// Clamp velocity and acceleration, move by the clamped velocity, fold the
    /// acceleration into the velocity and face `position - acceleration`.
    ///
    /// Position uses the velocity from before the fold, so this tick's
    /// steering shows up in next tick's position. The folded velocity is
    /// clamped again so the speed cap holds between ticks too.
    pub fn integrate(&mut self) {
        let max_speed = self.params.max_speed;
        self.velocity = clamp_length(self.velocity, 0.0, max_speed);
        self.acceleration = clamp_length(self.acceleration, 0.0, self.params.max_force);
        self.position += self.velocity;
        self.velocity = clamp_length(self.velocity + self.acceleration, 0.0, max_speed);
        // looking at `position - acceleration` from `position`
        self.orientation = facing(&-self.acceleration);
    }

    /// Toroidal wrap: x against `width`, y against `height`, z against the
    /// boid's own depth.
    pub fn constrain(&mut self, width: f64, height: f64) {
        self.position.x = wrap_coordinate(self.position.x, width);
        self.position.y = wrap_coordinate(self.position.y, height);
        self.position.z = wrap_coordinate(self.position.z, self.params.bounds.depth);
    }
}
