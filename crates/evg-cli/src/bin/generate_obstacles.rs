//! Write a random obstacle field.
//!
//! Usage:
//!   cargo run -p evg-cli --bin generate_obstacles -- --count 40 --seed 7 --output obstacles40.txt

use anyhow::Result;
use clap::Parser;
use evg_cli::init_tracing;
use evg_cli::io::save_obstacles;
use evg_cli::CliConfig;
use evg_core::{generate_obstacles, FieldConfig, DEFAULT_MIN_GAP, DEFAULT_OBSTACLE_COUNT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

/// Generate ground-standing box obstacles with a minimum spacing
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of obstacles
    #[arg(long, default_value_t = DEFAULT_OBSTACLE_COUNT)]
    count: usize,

    /// Minimum gap between any two obstacles in meters
    #[arg(long, default_value_t = DEFAULT_MIN_GAP)]
    min_gap: f64,

    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Footprint origins are drawn from [0, extent]
    #[arg(long, default_value_t = 720.0)]
    extent: f64,

    /// Draws allowed before giving up
    #[arg(long, default_value_t = 100_000)]
    max_attempts: usize,

    /// Output file
    #[arg(long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(CliConfig::from_env().log_json)?;

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let field = FieldConfig {
        extent: args.extent,
        max_attempts: args.max_attempts,
        ..FieldConfig::default()
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let obstacles = generate_obstacles(args.count, args.min_gap, &field, &mut rng)?;
    save_obstacles(&args.output, &obstacles)?;

    println!(
        "Wrote {} obstacles to {} (seed {}, min gap {}m)",
        obstacles.len(),
        args.output.display(),
        seed,
        args.min_gap
    );
    Ok(())
}
