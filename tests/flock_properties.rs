use nalgebra::Vector3;
use proptest::prelude::*;
use rflock::{
    AccelerationPolicy, Boid, BoidParams, Flock, FlockConfig, FlockError, TrajectoryRecorder,
    UpdateOrder,
};

const EPS: f64 = 1e-9;

fn config(
    population: usize,
    seed: u64,
    order: UpdateOrder,
    policy: AccelerationPolicy,
) -> FlockConfig {
    FlockConfig {
        population,
        seed,
        update_order: order,
        acceleration: policy,
        ..FlockConfig::default()
    }
}

fn assert_invariants(flock: &Flock) {
    let wrap = flock.config().wrap;
    for (i, b) in flock.iter().enumerate() {
        let p = b.params();
        assert!(b.velocity().norm() <= p.max_speed + EPS, "boid {i} too fast");
        assert!(b.acceleration().norm() <= p.max_force + EPS, "boid {i} over max force");
        let pos = b.position();
        assert!(pos.x.abs() <= wrap.width, "boid {i} x = {}", pos.x);
        assert!(pos.y.abs() <= wrap.height, "boid {i} y = {}", pos.y);
        assert!(pos.z.abs() <= p.bounds.depth, "boid {i} z = {}", pos.z);
        assert!((b.orientation().norm() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn default_flock_runs_a_thousand_ticks() {
    let mut flock = Flock::new(FlockConfig::default()).unwrap();
    assert_eq!(flock.len(), 125);
    for _ in 0..1000 {
        flock.update();
    }
    assert_eq!(flock.ticks(), 1000);
    assert_invariants(&flock);
}

#[test]
fn lone_boid_coasts_and_wraps() {
    let params = BoidParams::default();
    let boid = Boid::new(Vector3::new(79.9, 0.0, 0.0), Vector3::new(0.5, 0.0, 0.0), params);
    let mut flock = Flock::from_boids(vec![boid], FlockConfig::default()).unwrap();

    flock.update();
    let b = flock.get(0).unwrap();
    assert_eq!(b.position().x, -80.0);
    assert_eq!(b.velocity(), Vector3::new(0.5, 0.0, 0.0));
    assert_eq!(b.acceleration(), Vector3::zeros());

    flock.update();
    let b = flock.get(0).unwrap();
    assert!((b.position().x - -79.5).abs() < 1e-12);
}

#[test]
fn stationary_pair_pulls_together() {
    let params = BoidParams::default();
    let boids = vec![
        Boid::new(Vector3::new(-1.0, 0.0, 0.0), Vector3::zeros(), params.clone()),
        Boid::new(Vector3::new(1.0, 0.0, 0.0), Vector3::zeros(), params),
    ];
    let cfg = config(2, 0, UpdateOrder::Snapshot, AccelerationPolicy::Reset);
    let mut flock = Flock::from_boids(boids, cfg).unwrap();
    flock.update();

    let a = flock.get(0).unwrap();
    let b = flock.get(1).unwrap();
    // cohesion outweighs separation at this range
    assert!(a.velocity().x > 0.0);
    assert!(b.velocity().x < 0.0);
    assert!((a.velocity().x + b.velocity().x).abs() < 1e-12);
}

#[test]
fn states_round_trip_through_state_matrix() {
    let cfg = config(12, 3, UpdateOrder::Sequential, AccelerationPolicy::Carry);
    let mut flock = Flock::new(cfg).unwrap();
    for _ in 0..5 {
        flock.update();
    }
    let packed: Vec<f64> = flock.state_matrix().iter().flatten().copied().collect();
    let restored = Flock::from_states(&packed, FlockConfig::default()).unwrap();
    assert_eq!(restored.len(), 12);
    for (a, b) in flock.iter().zip(restored.iter()) {
        assert_eq!(a.position(), b.position());
        assert_eq!(a.velocity(), b.velocity());
        assert_eq!(b.acceleration(), Vector3::zeros());
    }
}

#[test]
fn malformed_states_are_rejected() {
    let err = Flock::from_states(&[0.0; 7], FlockConfig::default()).unwrap_err();
    assert!(matches!(err, FlockError::StateLength(7)));

    let mut states = vec![0.0; 12];
    states[9] = f64::INFINITY;
    let err = Flock::from_states(&states, FlockConfig::default()).unwrap_err();
    assert!(matches!(err, FlockError::NonFiniteState { index: 1 }));
}

#[test]
fn recorder_follows_the_first_boids() {
    let cfg = config(6, 11, UpdateOrder::Sequential, AccelerationPolicy::Carry);
    let mut flock = Flock::new(cfg).unwrap();
    let mut recorder = TrajectoryRecorder::first(flock.len(), 2);
    recorder.record(&flock);
    for _ in 0..4 {
        flock.update();
        recorder.record(&flock);
    }
    assert!(recorder.is_tracked(1));
    assert!(!recorder.is_tracked(2));
    let rows = recorder.trajectory_of(1).unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[4][6], 4.0);
    let last = flock.get(1).unwrap().position();
    assert_eq!([rows[4][0], rows[4][1], rows[4][2]], [last.x, last.y, last.z]);
    assert_eq!(recorder.trajectories().count(), 2);
}

fn order_strategy() -> impl Strategy<Value = UpdateOrder> {
    prop_oneof![Just(UpdateOrder::Sequential), Just(UpdateOrder::Snapshot)]
}

fn policy_strategy() -> impl Strategy<Value = AccelerationPolicy> {
    prop_oneof![Just(AccelerationPolicy::Carry), Just(AccelerationPolicy::Reset)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn proptest_invariants_hold_after_every_tick(
        population in 0usize..40,
        seed in any::<u64>(),
        ticks in 1usize..25,
        order in order_strategy(),
        policy in policy_strategy(),
    ) {
        let mut flock = Flock::new(config(population, seed, order, policy)).unwrap();
        for _ in 0..ticks {
            flock.update();
            assert_invariants(&flock);
        }
        prop_assert_eq!(flock.ticks(), ticks as u64);
        prop_assert_eq!(flock.len(), population);
    }

    #[test]
    fn proptest_same_seed_same_trajectory(
        population in 1usize..30,
        seed in any::<u64>(),
        order in order_strategy(),
    ) {
        let cfg = config(population, seed, order, AccelerationPolicy::Carry);
        let mut a = Flock::new(cfg.clone()).unwrap();
        let mut b = Flock::new(cfg).unwrap();
        for _ in 0..10 {
            a.update();
            b.update();
        }
        prop_assert_eq!(a.state_matrix(), b.state_matrix());
        prop_assert_eq!(a.orientations_flat(), b.orientations_flat());
    }

    #[test]
    fn proptest_neighbors_never_include_self(
        population in 1usize..40,
        seed in any::<u64>(),
        fov in 0.1f64..std::f64::consts::PI,
    ) {
        let cfg = config(population, seed, UpdateOrder::Sequential, AccelerationPolicy::Carry);
        let flock = Flock::new(cfg).unwrap();
        for b in &flock {
            let seen = b.neighbors(flock.boids(), fov);
            prop_assert!(seen.iter().all(|other| !std::ptr::eq(*other, b)));
            let range = b.params().view_distance;
            prop_assert!(seen.iter().all(|other| (other.position() - b.position()).norm() < range));
        }
    }

    #[test]
    fn proptest_rules_leave_accumulator_alone_without_neighbors(
        x in -50.0f64..50.0, y in -50.0f64..50.0, z in -50.0f64..50.0,
        ax in -1.0f64..1.0, ay in -1.0f64..1.0, az in -1.0f64..1.0,
        strength in 0.0f64..5.0,
    ) {
        let velocity = Vector3::new(0.1, 0.0, 0.0);
        let b = Boid::new(Vector3::new(x, y, z), velocity, BoidParams::default());
        let acc = Vector3::new(ax, ay, az);
        prop_assert_eq!(b.separate(&[], strength, acc), acc);
        prop_assert_eq!(b.align(&[], strength, acc), acc);
        prop_assert_eq!(b.cohese(&[], strength, acc), acc);
    }
}
