use crate::boid::Boid;
use crate::flock::Flock;
use serde::{Deserialize, Serialize};

/// Full state of one boid at one instant, for renderers and debug output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoidSnapshot {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub acceleration: [f64; 3],
    /// Unit quaternion `[x, y, z, w]` turning +Z onto the look direction.
    pub orientation: [f64; 4],
}

impl From<&Boid> for BoidSnapshot {
    fn from(b: &Boid) -> Self {
        let (p, v, a) = (b.position(), b.velocity(), b.acceleration());
        let q = b.orientation();
        Self {
            position: [p.x, p.y, p.z],
            velocity: [v.x, v.y, v.z],
            acceleration: [a.x, a.y, a.z],
            orientation: [q.i, q.j, q.k, q.w],
        }
    }
}

/// Per-boid trajectory log: `[x, y, z, vx, vy, vz, tick]` rows.
///
/// Only the boids selected at construction are recorded; the rest keep
/// `None` so nothing is allocated for them.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryRecorder {
    traj: Vec<Option<Vec<[f64; 7]>>>,
}

impl TrajectoryRecorder {
    /// Recorder for a flock of `population` boids that logs the listed
    /// indices. Indices past the population are ignored.
    pub fn new(population: usize, tracked: impl IntoIterator<Item = usize>) -> Self {
        let mut traj = vec![None; population];
        for i in tracked {
            if let Some(slot) = traj.get_mut(i) {
                *slot = Some(Vec::new());
            }
        }
        Self { traj }
    }

    /// Recorder that logs the first `count` boids.
    pub fn first(population: usize, count: usize) -> Self {
        Self::new(population, 0..count.min(population))
    }

    /// Append the current state of every tracked boid.
    pub fn record(&mut self, flock: &Flock) {
        let tick = flock.ticks() as f64;
        for (slot, boid) in self.traj.iter_mut().zip(flock.iter()) {
            if let Some(rows) = slot {
                let (p, v) = (boid.position(), boid.velocity());
                rows.push([p.x, p.y, p.z, v.x, v.y, v.z, tick]);
            }
        }
    }

    pub fn is_tracked(&self, i: usize) -> bool {
        matches!(self.traj.get(i), Some(Some(_)))
    }

    /// Rows of boid `i`, if it is tracked.
    pub fn trajectory_of(&self, i: usize) -> Option<&[[f64; 7]]> {
        self.traj.get(i).and_then(|t| t.as_deref())
    }

    /// `(index, rows)` for every tracked boid, in index order.
    pub fn trajectories(&self) -> impl Iterator<Item = (usize, &[[f64; 7]])> {
        self.traj
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_deref().map(|rows| (i, rows)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlockConfig;

    #[test]
    fn snapshot_copies_boid_state() {
        let states = [1.0, 2.0, 3.0, 0.1, 0.0, 0.0];
        let flock = Flock::from_states(&states, FlockConfig::default()).unwrap();
        let snap = BoidSnapshot::from(&flock.boids()[0]);
        assert_eq!(snap.position, [1.0, 2.0, 3.0]);
        assert_eq!(snap.velocity, [0.1, 0.0, 0.0]);
        assert_eq!(snap.acceleration, [0.0; 3]);
        assert_eq!(snap.orientation, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let flock = Flock::from_states(&[0.0; 6], FlockConfig::default()).unwrap();
        let json = serde_json::to_value(flock.snapshots()).unwrap();
        assert_eq!(json[0]["orientation"][3], 1.0);
    }

    #[test]
    fn records_only_tracked_boids() {
        let states = [
            0.0, 0.0, 0.0, 0.1, 0.0, 0.0, //
            20.0, 0.0, 0.0, 0.0, 0.1, 0.0, //
            -20.0, 0.0, 0.0, 0.0, 0.0, 0.1,
        ];
        let mut flock = Flock::from_states(&states, FlockConfig::default()).unwrap();
        let mut rec = TrajectoryRecorder::new(flock.len(), [0, 2, 9]);
        rec.record(&flock);
        flock.update();
        rec.record(&flock);

        assert!(rec.is_tracked(0));
        assert!(!rec.is_tracked(1));
        assert!(!rec.is_tracked(9));
        assert!(rec.trajectory_of(1).is_none());

        let rows = rec.trajectory_of(0).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][6], 0.0);
        assert_eq!(rows[1][6], 1.0);
        assert!((rows[1][0] - 0.1).abs() < 1e-12);

        let indices: Vec<usize> = rec.trajectories().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn first_caps_at_population() {
        let rec = TrajectoryRecorder::first(3, 10);
        assert_eq!(rec.trajectories().count(), 3);
    }
}
