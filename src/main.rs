use clap::{Parser, ValueEnum};
use nalgebra::Vector3;
use rflock::{AccelerationPolicy, Flock, FlockConfig, FlockResult, TrajectoryRecorder, UpdateOrder};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Run a boids flock headless and report where it ended up.
#[derive(Debug, Parser)]
#[command(name = "rflock", version)]
struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    population: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    #[arg(long, value_enum)]
    order: Option<Order>,

    /// Zero the acceleration before steering each tick.
    #[arg(long)]
    reset_acceleration: bool,

    /// Record trajectories of the first K boids.
    #[arg(long, default_value_t = 0)]
    record: usize,

    /// Print final snapshots and trajectories as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Order {
    Sequential,
    Snapshot,
}

impl From<Order> for UpdateOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Sequential => UpdateOrder::Sequential,
            Order::Snapshot => UpdateOrder::Snapshot,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn build_config(cli: &Cli) -> FlockResult<FlockConfig> {
    let mut config = match &cli.config {
        Some(path) => FlockConfig::from_path(path)?,
        None => FlockConfig::default(),
    };
    if let Some(population) = cli.population {
        config.population = population;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(order) = cli.order {
        config.update_order = order.into();
    }
    if cli.reset_acceleration {
        config.acceleration = AccelerationPolicy::Reset;
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> FlockResult<()> {
    let config = build_config(&cli)?;
    let mut flock = Flock::new(config)?;
    let mut recorder = TrajectoryRecorder::first(flock.len(), cli.record);
    recorder.record(&flock);

    let report_every = (cli.ticks / 10).max(1);
    for _ in 0..cli.ticks {
        let tick = flock.tick();
        recorder.record(&flock);
        if tick % report_every == 0 {
            let stats = FlockStats::of(&flock);
            info!(tick, mean_speed = stats.mean_speed, max_speed = stats.max_speed, "progress");
        }
    }

    if cli.json {
        let trajectories: Vec<_> = recorder
            .trajectories()
            .map(|(index, rows)| json!({ "index": index, "rows": rows }))
            .collect();
        let doc = json!({
            "ticks": flock.ticks(),
            "config": flock.config(),
            "boids": flock.snapshots(),
            "trajectories": trajectories,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        let stats = FlockStats::of(&flock);
        println!("boids          {}", flock.len());
        println!("ticks          {}", flock.ticks());
        println!(
            "centroid       ({:.3}, {:.3}, {:.3})",
            stats.centroid.x, stats.centroid.y, stats.centroid.z
        );
        println!("mean speed     {:.4}", stats.mean_speed);
        println!("max speed      {:.4}", stats.max_speed);
        println!("max accel      {:.4}", stats.max_acceleration);
    }
    Ok(())
}

struct FlockStats {
    centroid: Vector3<f64>,
    mean_speed: f64,
    max_speed: f64,
    max_acceleration: f64,
}

impl FlockStats {
    fn of(flock: &Flock) -> Self {
        let n = flock.len().max(1) as f64;
        let mut centroid = Vector3::zeros();
        let mut speed_sum = 0.0;
        let mut max_speed: f64 = 0.0;
        let mut max_acceleration: f64 = 0.0;
        for b in flock {
            centroid += b.position();
            let speed = b.velocity().norm();
            speed_sum += speed;
            max_speed = max_speed.max(speed);
            max_acceleration = max_acceleration.max(b.acceleration().norm());
        }
        Self {
            centroid: centroid / n,
            mean_speed: speed_sum / n,
            max_speed,
            max_acceleration,
        }
    }
}
