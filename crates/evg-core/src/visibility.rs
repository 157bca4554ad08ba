//! Visibility graph over obstacle corners lifted to cut planes.
//!
//! Vertices are the start, the goal, and every footprint corner of every
//! obstacle at each cut-plane height inside that obstacle's vertical extent.
//! Two vertices are joined when the straight segment between them neither
//! slips into the footprint of an obstacle owning one of them nor passes
//! through any box.

use crate::config::{GeometryTolerances, DEFAULT_CUT_PLANE_HEIGHTS};
use crate::cost::{CostModel, PhysicalCostModel};
use crate::error::{PlannerError, Result};
use crate::intersect::SegmentBoxIntersector;
use crate::models::{Obstacle, ObstacleId, Point3, Vertex, VertexId};
use crate::spatial::footprint_occludes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

/// Undirected edge, reported once with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub a: VertexId,
    pub b: VertexId,
    pub weight: f64,
}

/// Immutable graph produced by [`VisibilityGraphBuilder::build`].
#[derive(Debug, Clone)]
pub struct VisibilityGraph {
    vertices: Vec<Vertex>,
    adjacency: Vec<Vec<(VertexId, f64)>>,
    index: HashMap<[u64; 3], VertexId>,
    start: VertexId,
    goal: VertexId,
}

impl VisibilityGraph {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    pub fn position(&self, id: VertexId) -> Point3 {
        self.vertices[id.0].position
    }

    /// Neighbors of `id` with the edge weight to each.
    pub fn neighbors(&self, id: VertexId) -> &[(VertexId, f64)] {
        &self.adjacency[id.0]
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(a, list)| {
            list.iter()
                .filter(move |(b, _)| a < b.0)
                .map(move |&(b, weight)| Edge {
                    a: VertexId(a),
                    b,
                    weight,
                })
        })
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn edge_weight(&self, a: VertexId, b: VertexId) -> Option<f64> {
        self.adjacency
            .get(a.0)?
            .iter()
            .find(|(n, _)| *n == b)
            .map(|&(_, w)| w)
    }

    /// Vertex at exactly `point`, if any.
    pub fn find_vertex(&self, point: Point3) -> Option<VertexId> {
        self.index.get(&point.key()).copied()
    }

    pub fn start(&self) -> VertexId {
        self.start
    }

    pub fn goal(&self) -> VertexId {
        self.goal
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Builds a [`VisibilityGraph`] with explicit cut planes, tolerances and edge pricing.
pub struct VisibilityGraphBuilder<'m> {
    cut_planes: Vec<f64>,
    tolerances: GeometryTolerances,
    model: &'m dyn CostModel,
}

impl<'m> VisibilityGraphBuilder<'m> {
    pub fn new(cut_planes: &[f64], model: &'m dyn CostModel) -> Self {
        Self {
            cut_planes: cut_planes.to_vec(),
            tolerances: GeometryTolerances::default(),
            model,
        }
    }

    pub fn with_tolerances(mut self, tolerances: GeometryTolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    pub fn build(&self, obstacles: &[Obstacle], start: Point3, goal: Point3) -> Result<VisibilityGraph> {
        let started = Instant::now();
        let mut graph = self.generate_vertices(obstacles, start, goal);
        verify_ownership(&graph.vertices, obstacles, self.tolerances.owner_tolerance)?;

        let intersector = SegmentBoxIntersector::from(&self.tolerances);
        let n = graph.vertices.len();
        let mut tested = 0usize;
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (VertexId(i), VertexId(j));
                if (a == graph.start && b == graph.goal) || (a == graph.goal && b == graph.start) {
                    continue;
                }
                tested += 1;
                let (va, vb) = (graph.vertices[i], graph.vertices[j]);
                if self.occluded(&va, &vb, obstacles) {
                    continue;
                }
                if intersector.blocked(va.position, vb.position, obstacles) {
                    continue;
                }
                let weight = self.model.edge_cost(va.position, vb.position);
                graph.adjacency[i].push((b, weight));
                graph.adjacency[j].push((a, weight));
            }
        }

        debug!(
            obstacles = obstacles.len(),
            vertices = n,
            pairs = tested,
            edges = graph.edge_count(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "visibility graph built"
        );
        Ok(graph)
    }

    fn generate_vertices(&self, obstacles: &[Obstacle], start: Point3, goal: Point3) -> VisibilityGraph {
        let mut vertices = vec![Vertex::start(start)];
        let mut index = HashMap::new();
        index.insert(start.key(), VertexId(0));

        let goal_id = if goal.key() == start.key() {
            VertexId(0)
        } else {
            vertices.push(Vertex::goal(goal));
            index.insert(goal.key(), VertexId(1));
            VertexId(1)
        };

        for (i, obstacle) in obstacles.iter().enumerate() {
            for &z in &self.cut_planes {
                if !obstacle.spans_height(z) {
                    continue;
                }
                for (x, y) in obstacle.footprint().corners() {
                    let position = Point3::new(x, y, z);
                    index.entry(position.key()).or_insert_with(|| {
                        vertices.push(Vertex::corner(position, ObstacleId(i)));
                        VertexId(vertices.len() - 1)
                    });
                }
            }
        }

        let adjacency = vec![Vec::new(); vertices.len()];
        VisibilityGraph {
            vertices,
            adjacency,
            index,
            start: VertexId(0),
            goal: goal_id,
        }
    }

    /// Footprint rules: corners of one obstacle never see each other, and a
    /// segment may not continue into the footprint of an obstacle owning either end.
    fn occluded(&self, a: &Vertex, b: &Vertex, obstacles: &[Obstacle]) -> bool {
        let (owner_a, owner_b) = (a.owner(), b.owner());
        if owner_a.is_some() && owner_a == owner_b {
            return true;
        }
        let t = &self.tolerances;
        let enters = |from: &Vertex, to: &Vertex, owner: Option<ObstacleId>| {
            owner.is_some_and(|id| {
                footprint_occludes(
                    from.position.xy(),
                    to.position.xy(),
                    &obstacles[id.0].footprint(),
                    t.extension_ratio,
                    t.footprint_shrink,
                )
            })
        };
        enters(a, b, owner_b) || enters(b, a, owner_a)
    }
}

/// Every corner vertex must sit on a footprint corner of the obstacle it names.
fn verify_ownership(vertices: &[Vertex], obstacles: &[Obstacle], tolerance: f64) -> Result<()> {
    for vertex in vertices {
        let Some(id) = vertex.owner() else {
            continue;
        };
        let (x, y) = vertex.position.xy();
        let owned = obstacles.get(id.0).is_some_and(|o| {
            o.footprint()
                .corners()
                .iter()
                .any(|&(cx, cy)| ((cx - x).powi(2) + (cy - y).powi(2)).sqrt() < tolerance)
        });
        if !owned {
            return Err(PlannerError::OwningObstacleNotFound {
                vertex: vertex.position,
            });
        }
    }
    Ok(())
}

/// Build with the default tolerances and the default physical cost model.
pub fn build_visibility_graph(
    obstacles: &[Obstacle],
    start: Point3,
    goal: Point3,
    cut_planes: &[f64],
) -> Result<VisibilityGraph> {
    let model = PhysicalCostModel::default();
    VisibilityGraphBuilder::new(cut_planes, &model).build(obstacles, start, goal)
}

/// [`build_visibility_graph`] at the default cut-plane heights.
pub fn build_default_visibility_graph(
    obstacles: &[Obstacle],
    start: Point3,
    goal: Point3,
) -> Result<VisibilityGraph> {
    build_visibility_graph(obstacles, start, goal, &DEFAULT_CUT_PLANE_HEIGHTS)
}
