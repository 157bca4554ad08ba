//! Obstacle relevance filtering and safety-margin expansion.
//!
//! Stage 1 keeps obstacles whose footprint touches the straight start-goal
//! line. Stage 2 keeps every obstacle whose footprint touches the convex hull
//! of the stage-1 footprints. Anything outside that hull is assumed to be off
//! any reasonable route.

use crate::models::{Obstacle, ObstacleId, Point3};
use crate::spatial::{segment_intersects_rect, ConvexHull};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of both selection stages, indices into the input slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Obstacles crossed by the straight start-goal line (stage 1)
    pub candidates: Vec<ObstacleId>,
    /// Hull of the stage-1 footprint corners
    pub hull: ConvexHull,
    /// Obstacles touching the hull (stage 2, superset of `candidates`)
    pub selected: Vec<ObstacleId>,
}

impl Selection {
    /// Copy the selected obstacles out of `obstacles` in input order.
    pub fn obstacles(&self, obstacles: &[Obstacle]) -> Vec<Obstacle> {
        self.selected.iter().map(|id| obstacles[id.0]).collect()
    }
}

/// Stage 1: obstacles whose footprint touches the 2D segment `start -> goal`.
pub fn select_candidate_obstacles(
    start: Point3,
    goal: Point3,
    obstacles: &[Obstacle],
) -> Vec<ObstacleId> {
    obstacles
        .iter()
        .enumerate()
        .filter(|(_, o)| segment_intersects_rect(start.xy(), goal.xy(), &o.footprint()))
        .map(|(i, _)| ObstacleId(i))
        .collect()
}

/// Convex hull of the given footprints' corners.
pub fn footprint_hull(obstacles: &[Obstacle], ids: &[ObstacleId]) -> ConvexHull {
    let footprints: Vec<_> = ids.iter().map(|id| obstacles[id.0].footprint()).collect();
    ConvexHull::of_footprints(&footprints)
}

/// Both stages, keeping the intermediate results.
pub fn select_relevant_indices(start: Point3, goal: Point3, obstacles: &[Obstacle]) -> Selection {
    let candidates = select_candidate_obstacles(start, goal, obstacles);
    if candidates.is_empty() {
        debug!(total = obstacles.len(), "no obstacle crosses the direct line");
        return Selection::default();
    }

    let hull = footprint_hull(obstacles, &candidates);
    let selected: Vec<ObstacleId> = obstacles
        .iter()
        .enumerate()
        .filter(|(_, o)| hull.intersects_rect(&o.footprint()))
        .map(|(i, _)| ObstacleId(i))
        .collect();

    debug!(
        total = obstacles.len(),
        candidates = candidates.len(),
        hull_vertices = hull.vertices.len(),
        selected = selected.len(),
        "obstacle selection"
    );

    Selection {
        candidates,
        hull,
        selected,
    }
}

/// Obstacles relevant to a `start -> goal` query, in input order.
pub fn select_relevant_obstacles(
    start: Point3,
    goal: Point3,
    obstacles: &[Obstacle],
) -> Vec<Obstacle> {
    select_relevant_indices(start, goal, obstacles).obstacles(obstacles)
}

/// Inflate every obstacle by `margin` (see [`Obstacle::expanded`]).
pub fn expand_obstacles(obstacles: &[Obstacle], margin: f64) -> Vec<Obstacle> {
    obstacles.iter().map(|o| o.expanded(margin)).collect()
}
