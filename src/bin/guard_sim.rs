//! Headless guard simulation - scripted intruder vs patrolling guards
//!
//! Drives the full sense/plan/execute loop without a renderer: guards
//! patrol a small compound while a scripted player sneaks between two
//! loot points, occasionally making noise or tripping the laser grid.
//! Prints a pacing summary and writes a JSON report for tooling.

use std::path::PathBuf;

use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use night_warden::agent::Agent;
use night_warden::core::config::load_guard_config;
use night_warden::core::types::{Pose, Vec3};
use night_warden::difficulty::DifficultyTables;
use night_warden::interface::presentation::NullPresentation;
use night_warden::interface::spatial::OpenField;
use night_warden::simulation::{GuardRig, GuardWorld};

#[derive(Parser, Debug)]
#[command(name = "guard_sim")]
#[command(about = "Run a headless guard AI simulation and report pacing stats")]
struct Args {
    /// Simulation length in ticks (60 ticks per second)
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// RNG seed for the scripted player's movement jitter
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Directory holding guard.toml and difficulty.toml
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// Freeze difficulty at a fixed percentage instead of live tracking
    #[arg(long)]
    difficulty_override: Option<f32>,

    /// Output path for the JSON run report
    #[arg(long, default_value = "guard_sim_report.json")]
    report: PathBuf,
}

#[derive(Debug, Serialize)]
struct RunReport {
    ticks: u64,
    seed: u64,
    captures: u32,
    thefts: u32,
    noises_emitted: u32,
    laser_trips: u32,
    final_difficulty_percent: f32,
}

const DT: f32 = 1.0 / 60.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    tracing::info!(ticks = args.ticks, seed = args.seed, "starting guard simulation");

    let guard_config = match load_guard_config(&args.config_dir.join("guard.toml")) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("failed to load guard config: {e}");
            std::process::exit(1);
        }
    };
    let tables = match DifficultyTables::load(&args.config_dir.join("difficulty.toml")) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("failed to load difficulty tables: {e}");
            std::process::exit(1);
        }
    };

    let mut world = GuardWorld::new(tables);
    if let Some(percent) = args.difficulty_override {
        world.shared.difficulty.set_override(percent);
    }

    // Two guards on perpendicular routes around the compound
    let routes: [Vec<Vec3>; 2] = [
        vec![
            Vec3::new(-10.0, 0.0, -10.0),
            Vec3::new(10.0, 0.0, -10.0),
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(-10.0, 0.0, 10.0),
        ],
        vec![
            Vec3::new(0.0, 0.0, -14.0),
            Vec3::new(0.0, 0.0, 14.0),
        ],
    ];
    for route in routes {
        let spawn = route[0];
        let pose = Pose::looking_at(spawn, route[1]);
        let agent = Agent::new(guard_config.clone(), pose, route);
        world.spawn_guard(GuardRig::new(agent, Box::new(NullPresentation)));
    }

    let spatial = OpenField;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    // Scripted player: shuttles between two loot points with jitter
    let loot_points = [Vec3::new(-8.0, 0.0, 8.0), Vec3::new(8.0, 0.0, -8.0)];
    let mut player_pos = Vec3::new(-8.0, 0.0, 0.0);
    let mut loot_target = 0usize;
    let player_speed = 3.0;

    let mut thefts = 0u32;
    let mut captures = 0u32;
    let mut noises = 0u32;
    let mut laser_trips = 0u32;
    let mut laser_release_tick: Option<u64> = None;

    for tick in 0..args.ticks {
        // Move toward the current loot point with lateral jitter
        let target = loot_points[loot_target];
        let to_target = target - player_pos;
        if to_target.length() < 0.5 {
            world.note_theft();
            thefts += 1;
            loot_target = 1 - loot_target;
        } else {
            let jitter = Vec3::new(rng.gen_range(-0.3..0.3), 0.0, rng.gen_range(-0.3..0.3));
            player_pos = player_pos + (to_target.normalize() + jitter).normalize() * player_speed * DT;
        }

        // Occasional mishaps
        if rng.gen_bool(0.002) {
            world.emit_noise(player_pos, 12.0);
            noises += 1;
        }
        if rng.gen_bool(0.0008) {
            world.trip_laser(player_pos, 1);
            laser_trips += 1;
            laser_release_tick = Some(tick + 30);
        }
        if laser_release_tick == Some(tick) {
            world.laser_released();
            laser_release_tick = None;
        }

        world.player.position = Some(player_pos);
        let events = world.run_tick(&spatial, DT);
        if !events.is_empty() && world.player.caught {
            captures += 1;
            tracing::info!(tick, "player caught, resetting run");
            world.reset_run();
            player_pos = Vec3::new(-8.0, 0.0, 0.0);
            if let Some(percent) = args.difficulty_override {
                world.shared.difficulty.set_override(percent);
            }
        }
    }

    let report = RunReport {
        ticks: args.ticks,
        seed: args.seed,
        captures,
        thefts,
        noises_emitted: noises,
        laser_trips,
        final_difficulty_percent: world.difficulty_percent(),
    };

    println!("=== Guard Simulation Summary ===");
    println!("Ticks:        {}", report.ticks);
    println!("Thefts:       {}", report.thefts);
    println!("Captures:     {}", report.captures);
    println!("Noises:       {}", report.noises_emitted);
    println!("Laser trips:  {}", report.laser_trips);
    println!("Difficulty:   {:.0}%", report.final_difficulty_percent);

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&args.report, json) {
                tracing::warn!(error = %e, "failed to write run report");
            } else {
                println!("Report written to {}", args.report.display());
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to serialize run report"),
    }
}
