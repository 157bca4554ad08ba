//! Energy-aware 3D route planning through box obstacles.
//!
//! Obstacles near the direct line are selected and inflated by a safety
//! margin, a visibility graph is built over their corners at fixed cut-plane
//! heights, and A* finds the cheapest route under a physical energy model.

pub mod config;
pub mod cost;
pub mod error;
pub mod field;
pub mod intersect;
pub mod models;
pub mod planner;
pub mod search;
pub mod selection;
pub mod spatial;
pub mod visibility;

pub use config::{
    CostWeights, EdgeModelKind, GeometryTolerances, HeuristicMode, PlannerConfig, VehicleProfile,
    DEFAULT_CUT_PLANE_HEIGHTS,
};
pub use cost::{CostModel, PhysicalCostModel, PowerBreakdown, SimplifiedCostModel, TimeEnergy};
pub use error::{PlannerError, Result};
pub use field::{
    box_gap, format_obstacles, generate_obstacles, parse_obstacles, FieldConfig,
    DEFAULT_MIN_GAP, DEFAULT_OBSTACLE_COUNT,
};
pub use intersect::{segment_blocked, segment_intersects_box, SegmentBoxIntersector};
pub use models::{Footprint, Obstacle, ObstacleId, Point3, Vertex, VertexId, VertexKind};
pub use planner::{cost_model, plan_route, RoutePlan};
pub use search::{
    dijkstra, find_path, Path, PathMetrics, SearchOutcome, DIRECT_HEURISTIC_BOUND,
};
pub use selection::{
    expand_obstacles, footprint_hull, select_candidate_obstacles, select_relevant_indices,
    select_relevant_obstacles, Selection,
};
pub use spatial::{extend_past, footprint_occludes, segment_intersects_rect, ConvexHull};
pub use visibility::{
    build_default_visibility_graph, build_visibility_graph, Edge, VisibilityGraph,
    VisibilityGraphBuilder,
};
