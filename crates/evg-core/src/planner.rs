//! One-call route planning: select, expand, build, search.

use crate::config::{EdgeModelKind, PlannerConfig};
use crate::cost::{CostModel, PhysicalCostModel, SimplifiedCostModel};
use crate::error::{PlannerError, Result};
use crate::models::{Obstacle, Point3};
use crate::search::{find_path, PathMetrics, SearchOutcome};
use crate::selection::{expand_obstacles, select_relevant_indices, Selection};
use crate::visibility::{VisibilityGraph, VisibilityGraphBuilder};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything produced while answering one planning query.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub start: Point3,
    pub goal: Point3,
    /// Indices into the obstacle slice passed to [`plan_route`]
    pub selection: Selection,
    /// Selected obstacles after safety-margin expansion, as used by the graph
    pub obstacles: Vec<Obstacle>,
    pub graph: VisibilityGraph,
    pub outcome: SearchOutcome,
    /// Simplified-model totals for the found path
    pub metrics: Option<PathMetrics>,
}

impl RoutePlan {
    pub fn is_found(&self) -> bool {
        self.outcome.is_found()
    }
}

/// Edge pricing selected by the configuration.
pub fn cost_model(config: &PlannerConfig) -> Box<dyn CostModel> {
    match config.edge_model {
        EdgeModelKind::Physical => Box::new(PhysicalCostModel::new(
            config.vehicle.clone(),
            config.weights,
            config.heuristic,
        )),
        EdgeModelKind::Simplified => Box::new(SimplifiedCostModel::new(
            config.vehicle.clone(),
            config.weights,
            config.heuristic,
        )),
    }
}

/// Plan a route from `start` to `goal` through `obstacles`.
pub fn plan_route(
    start: Point3,
    goal: Point3,
    obstacles: &[Obstacle],
    config: &PlannerConfig,
) -> Result<RoutePlan> {
    config.validate()?;
    for (label, point) in [("start", start), ("goal", goal)] {
        if !point.is_finite() {
            return Err(PlannerError::InvalidConfig(format!(
                "{label} must have finite coordinates"
            )));
        }
    }

    let timer = Instant::now();
    let selection = select_relevant_indices(start, goal, obstacles);
    let selected_ms = timer.elapsed().as_secs_f64() * 1000.0;

    let expanded = expand_obstacles(&selection.obstacles(obstacles), config.safety_margin);

    let model = cost_model(config);
    let graph = VisibilityGraphBuilder::new(&config.cut_plane_heights, model.as_ref())
        .with_tolerances(config.tolerances)
        .build(&expanded, start, goal)?;
    let built_ms = timer.elapsed().as_secs_f64() * 1000.0;

    let outcome = find_path(&graph, graph.start(), graph.goal(), model.as_ref());
    let searched_ms = timer.elapsed().as_secs_f64() * 1000.0;

    debug!(
        selection_ms = selected_ms,
        graph_ms = built_ms - selected_ms,
        search_ms = searched_ms - built_ms,
        "planning stages"
    );

    let simplified = SimplifiedCostModel::new(config.vehicle.clone(), config.weights, config.heuristic);
    let metrics = outcome.path().map(|path| path.metrics(&simplified));

    match outcome.path() {
        Some(path) => info!(
            obstacles = obstacles.len(),
            selected = selection.selected.len(),
            vertices = graph.len(),
            edges = graph.edge_count(),
            waypoints = path.len(),
            cost = path.cost,
            nodes_expanded = path.nodes_expanded,
            "route found"
        ),
        None => warn!(
            obstacles = obstacles.len(),
            selected = selection.selected.len(),
            vertices = graph.len(),
            edges = graph.edge_count(),
            nodes_expanded = outcome.nodes_expanded(),
            "no path between start and goal"
        ),
    }

    Ok(RoutePlan {
        start,
        goal,
        selection,
        obstacles: expanded,
        graph,
        outcome,
        metrics,
    })
}
