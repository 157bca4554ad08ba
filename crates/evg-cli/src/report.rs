//! JSON snapshot of a planning run for rendering and inspection.

use chrono::{DateTime, Utc};
use evg_core::{
    Edge, Obstacle, PathMetrics, PlannerConfig, Point3, RoutePlan, SearchOutcome, Selection,
    Vertex,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    pub generated_at: DateTime<Utc>,
    pub start: Point3,
    pub goal: Point3,
    pub config: PlannerConfig,
    pub selection: Selection,
    /// Expanded obstacles the graph was built from
    pub obstacles: Vec<Obstacle>,
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    pub outcome: SearchOutcome,
    pub metrics: Option<PathMetrics>,
}

impl PlanReport {
    pub fn new(plan: &RoutePlan, config: &PlannerConfig) -> Self {
        Self {
            generated_at: Utc::now(),
            start: plan.start,
            goal: plan.goal,
            config: config.clone(),
            selection: plan.selection.clone(),
            obstacles: plan.obstacles.clone(),
            vertices: plan.graph.vertices().to_vec(),
            edges: plan.graph.edges().collect(),
            outcome: plan.outcome.clone(),
            metrics: plan.metrics,
        }
    }

    /// Waypoints of the found path, if any.
    pub fn path(&self) -> Option<&[Point3]> {
        self.outcome.path().map(|p| p.points.as_slice())
    }

    /// Human-readable summary lines.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Graph: {} obstacles selected ({} on the direct line), {} vertices, {} edges",
            self.selection.selected.len(),
            self.selection.candidates.len(),
            self.vertices.len(),
            self.edges.len()
        )];
        match &self.outcome {
            SearchOutcome::Found(path) => {
                lines.push(format!(
                    "Result: OK | cost={:.1} waypoints={} expanded={}",
                    path.cost,
                    path.len(),
                    path.nodes_expanded
                ));
                if let Some(m) = &self.metrics {
                    lines.push(format!(
                        "Metrics: length={:.1}m horizontal={:.1}m climb={:.1}m descent={:.1}m time={:.1}s energy={:.1}",
                        m.length_m, m.horizontal_m, m.climb_m, m.descent_m, m.time_s, m.energy
                    ));
                }
                for (i, p) in path.points.iter().enumerate() {
                    lines.push(format!("  {:>2}: ({:.1}, {:.1}, {:.1})", i, p.x, p.y, p.z));
                }
            }
            SearchOutcome::NoPathFound { nodes_expanded } => {
                lines.push(format!("Result: NO PATH | expanded={nodes_expanded}"));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evg_core::plan_route;

    #[test]
    fn report_serializes_graph_and_path() {
        let config = PlannerConfig::default();
        let obstacles = vec![
            Obstacle::new(10.0, 10.0, 0.0, 20.0, 20.0, 15.0).unwrap(),
            Obstacle::new(40.0, 10.0, 0.0, 50.0, 20.0, 15.0).unwrap(),
        ];
        let plan = plan_route(
            Point3::new(0.0, 15.0, 2.0),
            Point3::new(60.0, 15.0, 2.0),
            &obstacles,
            &config,
        )
        .unwrap();
        let report = PlanReport::new(&plan, &config);
        assert_eq!(report.path().map(<[Point3]>::len), Some(4));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"]["status"], "found");
        assert_eq!(json["vertices"][0]["kind"], "start");
        assert_eq!(json["obstacles"][0], serde_json::json!([8.0, 8.0, 0.0, 22.0, 22.0, 17.0]));
        assert!(json["edges"].as_array().unwrap().len() == plan.graph.edge_count());
        assert!(json["generated_at"].is_string());

        let back: PlanReport = serde_json::from_value(json).unwrap();
        assert_eq!(back.edges.len(), report.edges.len());
        assert!(report.summary()[1].starts_with("Result: OK"));
    }
}
