use crate::algorithms::flocking::{steer, AccelerationPolicy, SteeringParams};
use crate::algorithms::neighbors::{BruteForce, NeighborSearch};
use crate::boid::Boid;
use crate::config::{FlockConfig, UpdateOrder};
use crate::error::{FlockError, FlockResult};
use crate::sim::BoidSnapshot;
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// The whole population, ticked once per frame.
///
/// Size is fixed at construction; boids are never added or removed.
#[derive(Debug)]
pub struct Flock {
    boids: Vec<Boid>,
    config: FlockConfig,
    search: Box<dyn NeighborSearch>,
    ticks: u64,
    // scratch buffer for candidate indices, reused across boids and ticks
    candidates: Vec<usize>,
}

impl Flock {
    /// Validate `config` and spawn `config.population` boids from its seed.
    pub fn new(config: FlockConfig) -> FlockResult<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let boids: Vec<Boid> = (0..config.population)
            .map(|_| Boid::random(&config.boid, &mut rng))
            .collect();
        info!(population = boids.len(), seed = config.seed, "flock spawned");
        Ok(Self::assemble(boids, config))
    }

    /// Flock over prepared boids. `config.population` and `config.seed` are
    /// ignored; each boid keeps its own params, which are validated too.
    pub fn from_boids(boids: Vec<Boid>, config: FlockConfig) -> FlockResult<Self> {
        config.validate()?;
        for (index, boid) in boids.iter().enumerate() {
            boid.params().validate().map_err(|err| match err {
                FlockError::InvalidConfig { field, reason } => FlockError::InvalidConfig {
                    field,
                    reason: format!("boid {index}: {reason}"),
                },
                other => other,
            })?;
        }
        Ok(Self::assemble(boids, config))
    }

    /// Flock from packed `[x, y, z, vx, vy, vz]*` states, every boid using
    /// `config.boid`.
    pub fn from_states(states: &[f64], config: FlockConfig) -> FlockResult<Self> {
        config.validate()?;
        let boids = boids_from_states(states, &config)?;
        info!(population = boids.len(), "flock loaded from states");
        Ok(Self::assemble(boids, config))
    }

    fn assemble(boids: Vec<Boid>, config: FlockConfig) -> Self {
        Self {
            candidates: Vec::with_capacity(boids.len()),
            boids,
            config,
            search: Box::new(BruteForce),
            ticks: 0,
        }
    }

    /// Replace the candidate lookup.
    pub fn with_search(mut self, search: Box<dyn NeighborSearch>) -> Self {
        self.search = search;
        self
    }

    pub fn search_name(&self) -> &'static str { self.search.name() }

    pub fn config(&self) -> &FlockConfig { &self.config }

    pub fn boids(&self) -> &[Boid] { &self.boids }

    pub fn iter(&self) -> std::slice::Iter<'_, Boid> { self.boids.iter() }

    pub fn get(&self, index: usize) -> Option<&Boid> { self.boids.get(index) }

    pub fn len(&self) -> usize { self.boids.len() }

    pub fn is_empty(&self) -> bool { self.boids.is_empty() }

    /// Number of completed `update()` calls.
    pub fn ticks(&self) -> u64 { self.ticks }

    /// Advance every boid by one tick.
    pub fn update(&mut self) {
        match self.config.update_order {
            UpdateOrder::Sequential => self.update_sequential(),
            UpdateOrder::Snapshot => self.update_snapshot(),
        }
        self.ticks += 1;
        debug!(tick = self.ticks, boids = self.boids.len(), "flock updated");
    }

    /// `update()` followed by the new tick count.
    pub fn tick(&mut self) -> u64 {
        self.update();
        self.ticks
    }

    /// In-place pass in list order: boid `i` steers against boids `< i` as
    /// already moved this tick and boids `> i` as left by the previous tick.
    fn update_sequential(&mut self) {
        let steering = &self.config.steering;
        let policy = self.config.acceleration;
        for i in 0..self.boids.len() {
            let scratch = &mut self.candidates;
            let acc = steer_one(&self.boids, i, &*self.search, steering, policy, scratch);
            self.boids[i].apply(acc, &self.config.wrap);
        }
    }

    /// Double-buffered pass: all accelerations come from the state at the
    /// start of the tick, then every boid integrates.
    fn update_snapshot(&mut self) {
        let accelerations = self.snapshot_accelerations();
        let wrap = self.config.wrap;
        for (boid, acc) in self.boids.iter_mut().zip(accelerations) {
            boid.apply(acc, &wrap);
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn snapshot_accelerations(&mut self) -> Vec<Vector3<f64>> {
        let steering = &self.config.steering;
        let policy = self.config.acceleration;
        (0..self.boids.len())
            .map(|i| {
                let scratch = &mut self.candidates;
                steer_one(&self.boids, i, &*self.search, steering, policy, scratch)
            })
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn snapshot_accelerations(&mut self) -> Vec<Vector3<f64>> {
        use rayon::prelude::*;
        let boids = &self.boids;
        let search = &*self.search;
        let steering = &self.config.steering;
        let policy = self.config.acceleration;
        (0..boids.len())
            .into_par_iter()
            .map_init(Vec::new, |scratch, i| steer_one(boids, i, search, steering, policy, scratch))
            .collect()
    }

    /// Positions as `[x, y, z]` per boid, for GPU upload.
    pub fn positions_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.boids.len() * 3);
        for b in &self.boids {
            let p = b.position();
            out.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        }
        out
    }

    /// Orientations as quaternion `[x, y, z, w]` per boid.
    pub fn orientations_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.boids.len() * 4);
        for b in &self.boids {
            let q = b.orientation();
            out.extend_from_slice(&[q.i as f32, q.j as f32, q.k as f32, q.w as f32]);
        }
        out
    }

    /// `[x, y, z, vx, vy, vz]` per boid.
    pub fn state_matrix(&self) -> Vec<[f64; 6]> {
        self.boids
            .iter()
            .map(|b| {
                let (p, v) = (b.position(), b.velocity());
                [p.x, p.y, p.z, v.x, v.y, v.z]
            })
            .collect()
    }

    pub fn snapshots(&self) -> Vec<BoidSnapshot> {
        self.boids.iter().map(BoidSnapshot::from).collect()
    }
}

impl<'a> IntoIterator for &'a Flock {
    type Item = &'a Boid;
    type IntoIter = std::slice::Iter<'a, Boid>;

    fn into_iter(self) -> Self::IntoIter {
        self.boids.iter()
    }
}

/// Steered acceleration of `population[index]` against the rest, as the
/// population currently stands.
fn steer_one(
    population: &[Boid],
    index: usize,
    search: &dyn NeighborSearch,
    steering: &SteeringParams,
    policy: AccelerationPolicy,
    scratch: &mut Vec<usize>,
) -> Vector3<f64> {
    search.candidates(population, index, scratch);
    let me = &population[index];
    let neighbors = me.neighbors(scratch.iter().map(|&j| &population[j]), steering.fov);
    steer(me, &neighbors, steering, policy)
}

/// Convert packed states `[x, y, z, vx, vy, vz]*` into boids.
pub fn boids_from_states(states: &[f64], config: &FlockConfig) -> FlockResult<Vec<Boid>> {
    if states.len() % 6 != 0 {
        return Err(FlockError::StateLength(states.len()));
    }
    states
        .chunks_exact(6)
        .enumerate()
        .map(|(index, s)| {
            if s.iter().any(|c| !c.is_finite()) {
                return Err(FlockError::NonFiniteState { index });
            }
            Ok(Boid::new(
                Vector3::new(s[0], s[1], s[2]),
                Vector3::new(s[3], s[4], s[5]),
                config.boid.clone(),
            ))
        })
        .collect()
}
