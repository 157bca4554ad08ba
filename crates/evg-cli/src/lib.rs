//! EVG CLI - Command line tools for the EVG route planner.
//!
//! This crate provides the binaries:
//! - plan_route: plan one route through an obstacle file and export it as JSON
//! - generate_obstacles: write a random obstacle field
//! - planner_stress: run the scenario catalogue and cross-check A* against Dijkstra

pub mod args;
pub mod config;
pub mod io;
pub mod report;
pub mod scenarios;

pub use args::{parse_point, EdgeModelArg, HeuristicArg};
pub use config::{load_planner_config, CliConfig};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "evg_core=info,evg_cli=info";

/// Filter from `RUST_LOG` when it is set, otherwise `info` for the planner crates.
pub fn log_filter(rust_log: Option<&str>) -> anyhow::Result<tracing_subscriber::EnvFilter> {
    let directives = rust_log.filter(|s| !s.trim().is_empty()).unwrap_or(DEFAULT_LOG_FILTER);
    Ok(tracing_subscriber::EnvFilter::try_new(directives)?)
}

/// Install the global subscriber. `EVG_LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing(json: bool) -> anyhow::Result<()> {
    let rust_log = std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref())?;

    tracing_subscriber::registry()
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .with(filter)
        .init();
    Ok(())
}
