//! End-to-end planning scenarios.
//!
//! Run with: cargo test -p evg-core --test planner_scenarios

use evg_core::{
    build_default_visibility_graph, dijkstra, expand_obstacles, find_path, generate_obstacles,
    plan_route, segment_blocked, select_relevant_obstacles, CostModel, FieldConfig,
    HeuristicMode, Obstacle, ObstacleId, PhysicalCostModel, PlannerConfig, Point3,
    SearchOutcome, VertexKind, DEFAULT_MIN_GAP, DIRECT_HEURISTIC_BOUND,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn block_a() -> Obstacle {
    Obstacle::new(10.0, 10.0, 0.0, 20.0, 20.0, 15.0).unwrap()
}

fn block_b() -> Obstacle {
    Obstacle::new(40.0, 10.0, 0.0, 50.0, 20.0, 15.0).unwrap()
}

/// Start and goal whose direct line crosses both footprints.
fn endpoints() -> (Point3, Point3) {
    (Point3::new(0.0, 15.0, 2.0), Point3::new(60.0, 15.0, 2.0))
}

fn no_margin() -> PlannerConfig {
    PlannerConfig {
        safety_margin: 0.0,
        ..PlannerConfig::default()
    }
}

/// The route detours around both blocks via their corners at the first cut plane.
#[test]
fn test_two_blocks_route_uses_corners_of_both() {
    let (start, goal) = endpoints();
    let plan = plan_route(start, goal, &[block_a(), block_b()], &no_margin()).unwrap();
    let path = plan.outcome.path().expect("route around the blocks");

    let direct = PhysicalCostModel::default();
    assert!(path.cost > direct.edge_cost(start, goal));

    let owners: Vec<ObstacleId> = path
        .vertices
        .iter()
        .filter_map(|&v| match plan.graph.vertex(v).kind {
            VertexKind::Corner { obstacle, cut_plane_z } => {
                assert_eq!(cut_plane_z, 10.0);
                Some(obstacle)
            }
            _ => None,
        })
        .collect();
    assert!(owners.contains(&ObstacleId(0)));
    assert!(owners.contains(&ObstacleId(1)));

    for pair in path.points.windows(2) {
        assert!(!segment_blocked(pair[0], pair[1], &plan.obstacles));
    }
}

/// Unexpanded blocks with start and goal beside their footprints: the graph has
/// no start-goal edge, so the route runs through corners of both blocks.
#[test]
fn test_graph_route_beside_the_blocks() {
    let start = Point3::new(0.0, 0.0, 2.0);
    let goal = Point3::new(60.0, 0.0, 2.0);
    let graph = build_default_visibility_graph(&[block_a(), block_b()], start, goal).unwrap();
    let model = PhysicalCostModel::default();

    let outcome = find_path(&graph, graph.start(), graph.goal(), &model);
    let path = outcome.path().expect("route via both blocks");
    assert!(!path.is_empty());
    assert_eq!(path.points.first(), Some(&start));
    assert_eq!(path.points.last(), Some(&goal));
    assert!(path.cost > model.edge_cost(start, goal));

    let mut owners = Vec::new();
    for &v in &path.vertices {
        if let VertexKind::Corner { obstacle, cut_plane_z } = graph.vertex(v).kind {
            assert_eq!(cut_plane_z, 10.0);
            owners.push(obstacle);
        }
    }
    assert!(owners.contains(&ObstacleId(0)));
    assert!(owners.contains(&ObstacleId(1)));
}

/// Selection keeps only footprints the start-goal line crosses, so the same
/// query through `plan_route` leaves an empty graph and no path.
#[test]
fn test_plan_route_selection_drops_uncrossed_blocks() {
    let plan = plan_route(
        Point3::new(0.0, 0.0, 2.0),
        Point3::new(60.0, 0.0, 2.0),
        &[block_a(), block_b()],
        &no_margin(),
    )
    .unwrap();
    assert!(plan.selection.selected.is_empty());
    assert_eq!(plan.graph.len(), 2);
    assert!(!plan.is_found());
}

/// Identical start and goal give a single-vertex path of zero cost.
#[test]
fn test_start_equals_goal() {
    let p = Point3::new(30.0, 15.0, 5.0);
    let plan = plan_route(p, p, &[block_a(), block_b()], &no_margin()).unwrap();
    let path = plan.outcome.path().unwrap();
    assert_eq!(path.points, vec![p]);
    assert_eq!(path.cost, 0.0);
}

/// Obstacles outside the hull of the crossed footprints never reach the graph.
#[test]
fn test_far_obstacle_is_not_in_graph() {
    let (start, goal) = endpoints();
    let far = Obstacle::new(300.0, 300.0, 0.0, 340.0, 340.0, 45.0).unwrap();
    let plan = plan_route(start, goal, &[block_a(), far, block_b()], &no_margin()).unwrap();

    assert_eq!(plan.selection.selected, vec![ObstacleId(0), ObstacleId(2)]);
    assert_eq!(plan.obstacles.len(), 2);
    assert!(plan.graph.vertices().iter().all(|v| v.position.x < 100.0));
    assert!(plan.is_found());
}

/// With the lower-bound heuristic A* matches Dijkstra exactly; with the direct
/// heuristic it stays within `DIRECT_HEURISTIC_BOUND` of the optimum.
#[test]
fn test_a_star_against_dijkstra_on_random_fields() {
    let field = FieldConfig::default();
    for seed in 0..4u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let obstacles = generate_obstacles(25, DEFAULT_MIN_GAP, &field, &mut rng).unwrap();
        let start = Point3::new(0.0, 0.0, 5.0);
        let goal = Point3::new(780.0, 780.0, 5.0);

        let config = PlannerConfig::default();
        let selected = select_relevant_obstacles(start, goal, &obstacles);
        let expanded = expand_obstacles(&selected, config.safety_margin);
        let graph = build_default_visibility_graph(&expanded, start, goal).unwrap();

        let reference = dijkstra(&graph, graph.start(), graph.goal());
        let lower = PhysicalCostModel {
            heuristic: HeuristicMode::LowerBound,
            ..PhysicalCostModel::default()
        };
        let direct = PhysicalCostModel::default();
        let with_lower = find_path(&graph, graph.start(), graph.goal(), &lower);
        let with_direct = find_path(&graph, graph.start(), graph.goal(), &direct);

        match reference {
            SearchOutcome::Found(best) => {
                let a = with_lower.path().expect("lower bound search finds a path");
                assert!((a.cost - best.cost).abs() <= 1e-6 * best.cost.max(1.0));
                let d = with_direct.path().expect("direct search finds a path");
                assert!(d.cost >= best.cost - 1e-6 * best.cost.max(1.0));
                assert!(
                    d.cost <= best.cost * (1.0 + DIRECT_HEURISTIC_BOUND),
                    "seed {seed}: direct {} vs optimum {}",
                    d.cost,
                    best.cost
                );
                for pair in d.vertices.windows(2) {
                    assert!(graph.edge_weight(pair[0], pair[1]).is_some());
                }
            }
            SearchOutcome::NoPathFound { .. } => {
                assert!(!with_lower.is_found());
                assert!(!with_direct.is_found());
            }
        }
    }
}
