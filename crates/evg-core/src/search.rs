//! A* over a [`VisibilityGraph`].

use crate::cost::{CostModel, SimplifiedCostModel};
use crate::models::{Point3, VertexId};
use crate::visibility::VisibilityGraph;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use tracing::trace;

/// Relative excess over the Dijkstra optimum accepted from a search guided by
/// [`HeuristicMode::Direct`](crate::config::HeuristicMode::Direct).
pub const DIRECT_HEURISTIC_BOUND: f64 = 0.05;

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    f_score: FloatOrd,
    g_score: FloatOrd,
    vertex: VertexId,
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .cmp(&other.f_score)
            .then_with(|| self.g_score.cmp(&other.g_score))
            .then_with(|| self.vertex.cmp(&other.vertex))
    }
}

/// A start-to-goal route through the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub vertices: Vec<VertexId>,
    pub points: Vec<Point3>,
    /// Sum of the edge weights along the path
    pub cost: f64,
    /// Queue entries expanded before the goal was reached
    pub nodes_expanded: usize,
}

/// Geometric and simplified-model totals of a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PathMetrics {
    pub length_m: f64,
    pub horizontal_m: f64,
    pub climb_m: f64,
    pub descent_m: f64,
    pub time_s: f64,
    pub energy: f64,
}

impl Path {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn metrics(&self, simplified: &SimplifiedCostModel) -> PathMetrics {
        let mut metrics = PathMetrics::default();
        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            metrics.length_m += a.distance(&b);
            metrics.horizontal_m += a.horizontal_distance(&b);
            let dz = b.z - a.z;
            if dz > 0.0 {
                metrics.climb_m += dz;
            } else {
                metrics.descent_m -= dz;
            }
        }
        let te = simplified.path_breakdown(&self.points);
        metrics.time_s = te.time_s;
        metrics.energy = te.energy;
        metrics
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found(Path),
    /// Queue exhausted without reaching the goal.
    NoPathFound { nodes_expanded: usize },
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::NoPathFound { .. } => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::NoPathFound { .. } => None,
        }
    }

    pub fn nodes_expanded(&self) -> usize {
        match self {
            SearchOutcome::Found(path) => path.nodes_expanded,
            SearchOutcome::NoPathFound { nodes_expanded } => *nodes_expanded,
        }
    }
}

/// A* from `start` to `goal`, guided by `model`'s heuristic.
///
/// Edge weights are read from the graph; the model only estimates the
/// remaining cost. The result is optimal when that estimate is admissible.
pub fn find_path<M>(graph: &VisibilityGraph, start: VertexId, goal: VertexId, model: &M) -> SearchOutcome
where
    M: CostModel + ?Sized,
{
    if goal.0 >= graph.len() {
        return SearchOutcome::NoPathFound { nodes_expanded: 0 };
    }
    let goal_point = graph.position(goal);
    search_with(graph, start, goal, |v| model.heuristic(graph.position(v), goal_point))
}

/// Uniform-cost search; the reference optimum for a graph.
pub fn dijkstra(graph: &VisibilityGraph, start: VertexId, goal: VertexId) -> SearchOutcome {
    search_with(graph, start, goal, |_| 0.0)
}

fn search_with<H>(graph: &VisibilityGraph, start: VertexId, goal: VertexId, heuristic: H) -> SearchOutcome
where
    H: Fn(VertexId) -> f64,
{
    if start.0 >= graph.len() || goal.0 >= graph.len() {
        return SearchOutcome::NoPathFound { nodes_expanded: 0 };
    }

    let mut open_set: BinaryHeap<Reverse<OpenEntry>> = BinaryHeap::new();
    let mut g_score: HashMap<VertexId, f64> = HashMap::new();
    let mut came_from: HashMap<VertexId, VertexId> = HashMap::new();

    g_score.insert(start, 0.0);
    open_set.push(Reverse(OpenEntry {
        f_score: FloatOrd(heuristic(start)),
        g_score: FloatOrd(0.0),
        vertex: start,
    }));

    let mut nodes_expanded = 0usize;

    while let Some(Reverse(current)) = open_set.pop() {
        let best_g = g_score.get(&current.vertex).copied().unwrap_or(f64::INFINITY);
        if current.g_score.0 > best_g {
            continue;
        }
        nodes_expanded += 1;

        if current.vertex == goal {
            let mut vertices = vec![goal];
            let mut node = goal;
            while let Some(&prev) = came_from.get(&node) {
                vertices.push(prev);
                node = prev;
            }
            vertices.reverse();
            let points = vertices.iter().map(|&v| graph.position(v)).collect();
            return SearchOutcome::Found(Path {
                vertices,
                points,
                cost: best_g,
                nodes_expanded,
            });
        }

        trace!(vertex = current.vertex.0, g = best_g, f = current.f_score.0, "expand");

        for &(neighbor, weight) in graph.neighbors(current.vertex) {
            let tentative_g = best_g + weight;
            if tentative_g < g_score.get(&neighbor).copied().unwrap_or(f64::INFINITY) {
                g_score.insert(neighbor, tentative_g);
                came_from.insert(neighbor, current.vertex);
                open_set.push(Reverse(OpenEntry {
                    f_score: FloatOrd(tentative_g + heuristic(neighbor)),
                    g_score: FloatOrd(tentative_g),
                    vertex: neighbor,
                }));
            }
        }
    }

    SearchOutcome::NoPathFound { nodes_expanded }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeuristicMode;
    use crate::cost::PhysicalCostModel;
    use crate::models::Obstacle;
    use crate::visibility::build_default_visibility_graph;

    fn two_blocks() -> Vec<Obstacle> {
        vec![
            Obstacle::new(10.0, 10.0, 0.0, 20.0, 20.0, 15.0).unwrap(),
            Obstacle::new(40.0, 10.0, 0.0, 50.0, 20.0, 15.0).unwrap(),
        ]
    }

    #[test]
    fn open_entries_pop_lowest_f_then_g_then_id() {
        let mut heap = BinaryHeap::new();
        let entry = |f: f64, g: f64, v: usize| {
            Reverse(OpenEntry {
                f_score: FloatOrd(f),
                g_score: FloatOrd(g),
                vertex: VertexId(v),
            })
        };
        heap.push(entry(5.0, 1.0, 3));
        heap.push(entry(4.0, 2.0, 7));
        heap.push(entry(4.0, 2.0, 2));
        heap.push(entry(4.0, 1.0, 9));
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|Reverse(e)| e.vertex.0)).collect();
        assert_eq!(order, vec![9, 2, 7, 3]);
    }

    #[test]
    fn path_goes_around_both_blocks() {
        let start = Point3::new(0.0, 15.0, 2.0);
        let goal = Point3::new(60.0, 15.0, 2.0);
        let graph = build_default_visibility_graph(&two_blocks(), start, goal).unwrap();
        let model = PhysicalCostModel::default();

        let outcome = find_path(&graph, graph.start(), graph.goal(), &model);
        let path = outcome.path().expect("path around the blocks");
        assert_eq!(path.points.first(), Some(&start));
        assert_eq!(path.points.last(), Some(&goal));
        assert_eq!(path.len(), 4);
        assert!(path.cost > model.edge_cost(start, goal));

        let summed: f64 = path
            .vertices
            .windows(2)
            .map(|w| graph.edge_weight(w[0], w[1]).unwrap())
            .sum();
        assert!((summed - path.cost).abs() < 1e-6);
    }

    #[test]
    fn lower_bound_matches_dijkstra() {
        let start = Point3::new(0.0, 15.0, 2.0);
        let goal = Point3::new(60.0, 15.0, 2.0);
        let graph = build_default_visibility_graph(&two_blocks(), start, goal).unwrap();
        let model = PhysicalCostModel {
            heuristic: HeuristicMode::LowerBound,
            ..Default::default()
        };
        let a_star = find_path(&graph, graph.start(), graph.goal(), &model);
        let reference = dijkstra(&graph, graph.start(), graph.goal());
        let (a, d) = (a_star.path().unwrap(), reference.path().unwrap());
        assert!((a.cost - d.cost).abs() < 1e-6);
    }

    #[test]
    fn start_equal_to_goal_is_free() {
        let p = Point3::new(5.0, 5.0, 5.0);
        let graph = build_default_visibility_graph(&two_blocks(), p, p).unwrap();
        let outcome = find_path(&graph, graph.start(), graph.goal(), &PhysicalCostModel::default());
        let path = outcome.into_path().unwrap();
        assert_eq!(path.vertices, vec![graph.start()]);
        assert_eq!(path.cost, 0.0);
        assert_eq!(path.metrics(&SimplifiedCostModel::default()), PathMetrics::default());
    }

    #[test]
    fn disconnected_goal_reports_no_path() {
        let graph = build_default_visibility_graph(
            &[],
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(60.0, 0.0, 2.0),
        )
        .unwrap();
        let outcome = find_path(&graph, graph.start(), graph.goal(), &PhysicalCostModel::default());
        assert_eq!(outcome, SearchOutcome::NoPathFound { nodes_expanded: 1 });
        assert!(!outcome.is_found());
        assert!(outcome.path().is_none());
    }

    #[test]
    fn metrics_split_climb_and_descent() {
        let path = Path {
            vertices: vec![VertexId(0), VertexId(2), VertexId(1)],
            points: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(3.0, 4.0, 10.0),
                Point3::new(3.0, 4.0, 4.0),
            ],
            cost: 0.0,
            nodes_expanded: 0,
        };
        let m = path.metrics(&SimplifiedCostModel::default());
        assert!((m.horizontal_m - 5.0).abs() < 1e-12);
        assert!((m.climb_m - 10.0).abs() < 1e-12);
        assert!((m.descent_m - 6.0).abs() < 1e-12);
        assert!((m.length_m - (125.0f64.sqrt() + 6.0)).abs() < 1e-12);
        assert!((m.time_s - (5.0 / 23.0 + 10.0 / 6.0 + 6.0 / 5.0)).abs() < 1e-12);
        assert!((m.energy - (5.0 + 16.0 * 4.0)).abs() < 1e-12);
    }
}
