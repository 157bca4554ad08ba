//! Run every catalogue scenario and cross-check the search.
//!
//! For each scenario the lower-bound A* must match Dijkstra, the direct
//! heuristic must stay within `DIRECT_HEURISTIC_BOUND` of it, and every path
//! segment must be clear.

use anyhow::{bail, Result};
use evg_cli::scenarios::{catalogue, Scenario};
use evg_cli::{init_tracing, CliConfig};
use evg_core::{
    cost_model, dijkstra, find_path, plan_route, CostModel, HeuristicMode, PlannerConfig,
    RoutePlan, SearchOutcome, SegmentBoxIntersector, DIRECT_HEURISTIC_BOUND,
};

const COST_TOLERANCE: f64 = 1e-6;

fn main() -> Result<()> {
    let cli = CliConfig::from_env();
    init_tracing(cli.log_json)?;
    let config = cli.planner_config(None)?;

    let mut failures = 0usize;
    for scenario in catalogue()? {
        println!("\n=== {} ===", scenario.name);
        let plan = plan_route(scenario.start, scenario.goal, &scenario.obstacles, &config)?;
        match &plan.outcome {
            SearchOutcome::Found(path) => println!(
                "Result: OK | vertices={} edges={} waypoints={} cost={:.1} expanded={}",
                plan.graph.len(),
                plan.graph.edge_count(),
                path.len(),
                path.cost,
                path.nodes_expanded
            ),
            SearchOutcome::NoPathFound { nodes_expanded } => println!(
                "Result: NO PATH | vertices={} edges={} expanded={}",
                plan.graph.len(),
                plan.graph.edge_count(),
                nodes_expanded
            ),
        }

        let problems = check(&scenario, &plan, &config);
        if problems.is_empty() {
            println!("Check: PASS");
        } else {
            failures += 1;
            println!("Check: FAIL ({})", problems.len());
            for problem in problems {
                println!(" - {}", problem);
            }
        }
    }

    if failures > 0 {
        bail!("{failures} scenario(s) failed");
    }
    Ok(())
}

/// The configured edge model with a different heuristic.
fn with_heuristic(config: &PlannerConfig, heuristic: HeuristicMode) -> Box<dyn CostModel> {
    let mut config = config.clone();
    config.heuristic = heuristic;
    cost_model(&config)
}

fn check(scenario: &Scenario, plan: &RoutePlan, config: &PlannerConfig) -> Vec<String> {
    let mut problems = Vec::new();
    if let Some(expected) = scenario.expect_path {
        if plan.is_found() != expected {
            problems.push(format!("expected path: {expected}, found: {}", plan.is_found()));
        }
    }

    let graph = &plan.graph;
    let reference = dijkstra(graph, graph.start(), graph.goal());
    let lower = with_heuristic(config, HeuristicMode::LowerBound);
    let direct = with_heuristic(config, HeuristicMode::Direct);
    let with_lower = find_path(graph, graph.start(), graph.goal(), lower.as_ref());
    let with_direct = find_path(graph, graph.start(), graph.goal(), direct.as_ref());

    match reference.path() {
        Some(best) => {
            let tol = COST_TOLERANCE * best.cost.max(1.0);
            match with_lower.path() {
                Some(p) if (p.cost - best.cost).abs() <= tol => {}
                Some(p) => problems.push(format!(
                    "lower-bound A* cost {:.3} differs from Dijkstra {:.3}",
                    p.cost, best.cost
                )),
                None => problems.push("lower-bound A* found no path".to_string()),
            }
            match with_direct.path() {
                Some(p) if p.cost <= best.cost * (1.0 + DIRECT_HEURISTIC_BOUND) + tol => {}
                Some(p) => problems.push(format!(
                    "direct A* cost {:.3} exceeds Dijkstra optimum {:.3} by more than {:.0}%",
                    p.cost,
                    best.cost,
                    DIRECT_HEURISTIC_BOUND * 100.0
                )),
                None => problems.push("direct A* found no path".to_string()),
            }
            println!(
                "Dijkstra: cost={:.1} expanded={} | lower-bound expanded={}",
                best.cost,
                best.nodes_expanded,
                with_lower.nodes_expanded()
            );
        }
        None => {
            if with_lower.is_found() || with_direct.is_found() {
                problems.push("A* found a path Dijkstra did not".to_string());
            }
        }
    }

    let intersector = SegmentBoxIntersector::from(&config.tolerances);
    if let Some(path) = plan.outcome.path() {
        for pair in path.points.windows(2) {
            if intersector.blocked(pair[0], pair[1], &plan.obstacles) {
                problems.push(format!(
                    "segment ({:.1}, {:.1}, {:.1}) -> ({:.1}, {:.1}, {:.1}) is blocked",
                    pair[0].x, pair[0].y, pair[0].z, pair[1].x, pair[1].y, pair[1].z
                ));
            }
        }
    }
    problems
}
