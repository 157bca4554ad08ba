//! Planner configuration: cut planes, safety margin, vehicle profile and cost weights.

use crate::error::PlannerError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CUT_PLANE_HEIGHTS: [f64; 5] = [10.0, 20.0, 30.0, 40.0, 50.0];

/// Physical and kinematic parameters of the vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleProfile {
    /// Airframe mass in kilograms
    pub airframe_mass_kg: f64,
    /// Payload mass in kilograms
    pub payload_mass_kg: f64,
    /// Reference (frontal) area in square meters
    pub frontal_area_m2: f64,
    pub drag_coefficient: f64,
    /// Induced power factor applied to the downwash term
    pub induced_power_factor: f64,
    /// Induced (downwash) velocity in m/s
    pub downwash_velocity_mps: f64,
    pub air_density_kg_m3: f64,
    pub gravity_mps2: f64,
    /// Cruise speed used by the physical model
    pub cruise_speed_mps: f64,
    /// Horizontal speed used by the simplified model
    pub horizontal_speed_mps: f64,
    pub ascent_speed_mps: f64,
    pub descent_speed_mps: f64,
    /// Simplified-model energy per meter climbed or descended
    pub vertical_energy_coeff: f64,
    /// Simplified-model energy per horizontal meter
    pub horizontal_energy_coeff: f64,
}

impl Default for VehicleProfile {
    fn default() -> Self {
        Self {
            airframe_mass_kg: 50.0,
            payload_mass_kg: 10.0,
            frontal_area_m2: 1.59 * 1.9 + 4.0 * 3.14 * 0.3 * 0.3,
            drag_coefficient: 0.3,
            induced_power_factor: 1.15,
            downwash_velocity_mps: 5.0,
            air_density_kg_m3: 1.225,
            gravity_mps2: 9.8,
            cruise_speed_mps: 12.0,
            horizontal_speed_mps: 23.0,
            ascent_speed_mps: 6.0,
            descent_speed_mps: 5.0,
            vertical_energy_coeff: 4.0,
            horizontal_energy_coeff: 1.0,
        }
    }
}

impl VehicleProfile {
    pub fn mass_kg(&self) -> f64 {
        self.airframe_mass_kg + self.payload_mass_kg
    }

    pub fn with_payload(mut self, payload_mass_kg: f64) -> Self {
        self.payload_mass_kg = payload_mass_kg;
        self
    }

    pub fn validate(&self) -> Result<(), PlannerError> {
        let positive = [
            ("cruise_speed_mps", self.cruise_speed_mps),
            ("horizontal_speed_mps", self.horizontal_speed_mps),
            ("ascent_speed_mps", self.ascent_speed_mps),
            ("descent_speed_mps", self.descent_speed_mps),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PlannerError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("airframe_mass_kg", self.airframe_mass_kg),
            ("payload_mass_kg", self.payload_mass_kg),
            ("frontal_area_m2", self.frontal_area_m2),
            ("drag_coefficient", self.drag_coefficient),
            ("induced_power_factor", self.induced_power_factor),
            ("downwash_velocity_mps", self.downwash_velocity_mps),
            ("air_density_kg_m3", self.air_density_kg_m3),
            ("gravity_mps2", self.gravity_mps2),
            ("vertical_energy_coeff", self.vertical_energy_coeff),
            ("horizontal_energy_coeff", self.horizontal_energy_coeff),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PlannerError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Blend weights: physical cost is `k1*energy + k2*distance`,
/// simplified cost is `k1*time + k2*energy`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    pub k1: f64,
    pub k2: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self { k1: 1.0, k2: 1.0 }
    }
}

/// Which model produces graph edge weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeModelKind {
    #[default]
    Physical,
    Simplified,
}

/// How the search estimates the remaining cost to the goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicMode {
    /// Cost of the straight segment to the goal. Not proven admissible.
    #[default]
    Direct,
    /// Straight-line distance times the cheapest achievable cost per meter.
    LowerBound,
    /// Simplified-model cost of the straight segment to the goal, whichever
    /// model prices the edges.
    Simplified,
    /// No estimate (Dijkstra).
    Zero,
}

/// Numeric tolerances used by the geometric predicates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryTolerances {
    /// Inward shrink of boxes before the 3D segment test
    pub box_shrink: f64,
    /// Inward shrink of footprints before the 2D occlusion test
    pub footprint_shrink: f64,
    /// Fraction of the 2D delta a segment is extended past its far endpoint
    pub extension_ratio: f64,
    /// Max distance between a corner vertex and its footprint corner
    pub owner_tolerance: f64,
    /// Separating axes shorter than this are ignored
    pub axis_epsilon: f64,
}

impl Default for GeometryTolerances {
    fn default() -> Self {
        Self {
            box_shrink: 1e-6,
            footprint_shrink: 1e-4,
            extension_ratio: 0.01,
            owner_tolerance: 1e-4,
            axis_epsilon: 1e-6,
        }
    }
}

/// Everything a single planning query needs besides start, goal and obstacles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Ordered cut-plane heights at which corner vertices are generated
    pub cut_plane_heights: Vec<f64>,
    /// Horizontal and overhead clearance added to every relevant obstacle
    pub safety_margin: f64,
    pub vehicle: VehicleProfile,
    pub weights: CostWeights,
    pub edge_model: EdgeModelKind,
    pub heuristic: HeuristicMode,
    pub tolerances: GeometryTolerances,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            cut_plane_heights: DEFAULT_CUT_PLANE_HEIGHTS.to_vec(),
            safety_margin: 2.0,
            vehicle: VehicleProfile::default(),
            weights: CostWeights::default(),
            edge_model: EdgeModelKind::default(),
            heuristic: HeuristicMode::default(),
            tolerances: GeometryTolerances::default(),
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), PlannerError> {
        if let Some(z) = self.cut_plane_heights.iter().find(|z| !z.is_finite()) {
            return Err(PlannerError::InvalidConfig(format!(
                "cut plane height must be finite, got {z}"
            )));
        }
        if !(self.safety_margin.is_finite() && self.safety_margin >= 0.0) {
            return Err(PlannerError::InvalidConfig(format!(
                "safety_margin must be non-negative, got {}",
                self.safety_margin
            )));
        }
        for (name, value) in [("k1", self.weights.k1), ("k2", self.weights.k2)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PlannerError::InvalidConfig(format!(
                    "weight {name} must be non-negative, got {value}"
                )));
            }
        }
        let t = &self.tolerances;
        for (name, value) in [
            ("box_shrink", t.box_shrink),
            ("footprint_shrink", t.footprint_shrink),
            ("extension_ratio", t.extension_ratio),
            ("owner_tolerance", t.owner_tolerance),
            ("axis_epsilon", t.axis_epsilon),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PlannerError::InvalidConfig(format!(
                    "tolerance {name} must be non-negative, got {value}"
                )));
            }
        }
        self.vehicle.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PlannerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cut_plane_heights, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
        assert!((config.vehicle.mass_kg() - 60.0).abs() < 1e-12);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: PlannerConfig = serde_json::from_str(
            r#"{ "safety_margin": 3.5, "vehicle": { "cruise_speed_mps": 15 }, "heuristic": "lower_bound" }"#,
        )
        .unwrap();
        assert_eq!(config.safety_margin, 3.5);
        assert_eq!(config.vehicle.cruise_speed_mps, 15.0);
        assert_eq!(config.vehicle.ascent_speed_mps, 6.0);
        assert_eq!(config.heuristic, HeuristicMode::LowerBound);
        assert_eq!(config.edge_model, EdgeModelKind::Physical);
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = PlannerConfig::default();
        config.safety_margin = -1.0;
        assert!(matches!(config.validate(), Err(PlannerError::InvalidConfig(_))));

        let mut config = PlannerConfig::default();
        config.vehicle.descent_speed_mps = 0.0;
        assert!(config.validate().is_err());

        let mut config = PlannerConfig::default();
        config.cut_plane_heights.push(f64::INFINITY);
        assert!(config.validate().is_err());
    }
}
