//! Plan one route through an obstacle file.
//!
//! Usage:
//!   cargo run -p evg-cli --bin plan_route -- --obstacles field.txt --start 0,15,2 --goal 60,15,2

use anyhow::Result;
use clap::Parser;
use evg_cli::io::{load_obstacles, write_json};
use evg_cli::report::PlanReport;
use evg_cli::{init_tracing, parse_point, CliConfig, EdgeModelArg, HeuristicArg};
use evg_core::{plan_route, Point3};
use std::path::PathBuf;

/// Plan a minimum-cost route around box obstacles
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Obstacle file, one `x_min y_min z_min x_max y_max z_max` per line
    #[arg(long)]
    obstacles: PathBuf,

    /// Start point as x,y,z
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    start: Point3,

    /// Goal point as x,y,z
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    goal: Point3,

    /// JSON planner configuration (overrides EVG_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Safety margin added around every selected obstacle
    #[arg(long)]
    margin: Option<f64>,

    /// Search heuristic
    #[arg(long, value_enum)]
    heuristic: Option<HeuristicArg>,

    /// Model used for graph edge weights
    #[arg(long, value_enum)]
    edge_model: Option<EdgeModelArg>,

    /// Write the full plan report as JSON
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cli = CliConfig::from_env();
    init_tracing(cli.log_json)?;

    let mut config = cli.planner_config(args.config.as_deref())?;
    if let Some(margin) = args.margin {
        config.safety_margin = margin;
    }
    if let Some(heuristic) = args.heuristic {
        config.heuristic = heuristic.into();
    }
    if let Some(edge_model) = args.edge_model {
        config.edge_model = edge_model.into();
    }

    let obstacles = load_obstacles(&args.obstacles)?;
    println!(
        "Loaded {} obstacles from {}",
        obstacles.len(),
        args.obstacles.display()
    );
    println!(
        "  Start: ({}, {}, {})  Goal: ({}, {}, {})",
        args.start.x, args.start.y, args.start.z, args.goal.x, args.goal.y, args.goal.z
    );
    println!(
        "  Margin: {}m, Heuristic: {:?}, Edge model: {:?}",
        config.safety_margin, config.heuristic, config.edge_model
    );
    println!();

    let plan = plan_route(args.start, args.goal, &obstacles, &config)?;
    let report = PlanReport::new(&plan, &config);
    for line in report.summary() {
        println!("{line}");
    }

    if let Some(output) = &args.output {
        write_json(output, &report)?;
        println!("\nReport written to {}", output.display());
    }

    Ok(())
}
