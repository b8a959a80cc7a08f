//! Brute-force 3D boids.
//!
//! A [`Flock`] owns an ordered population of [`Boid`]s. Each
//! [`Flock::update`] runs, for every boid in turn, the perception test
//! (distance and field of view), the separation, alignment and cohesion
//! rules, integration and toroidal wrapping. Rendering is left to the host:
//! it reads positions and orientations back out.

pub mod algorithms;
pub mod boid;
pub mod config;
pub mod error;
pub mod flock;
pub mod math;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use algorithms::flocking::{AccelerationPolicy, SteeringParams};
pub use algorithms::neighbors::{BruteForce, NeighborSearch};
pub use boid::Boid;
pub use config::{BoidParams, Bounds, FlockConfig, UpdateOrder, WrapExtent};
pub use error::{FlockError, FlockResult};
pub use flock::Flock;
pub use sim::{BoidSnapshot, TrajectoryRecorder};
