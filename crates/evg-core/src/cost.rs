//! Edge cost models and search heuristics.
//!
//! The physical model prices a straight segment by the energy a multirotor
//! spends flying it at cruise speed (drag, induced downwash and climb power)
//! blended with its length. The simplified model uses fixed horizontal and
//! vertical speeds and per-meter energy coefficients.

use crate::config::{CostWeights, HeuristicMode, VehicleProfile};
use crate::models::Point3;
use serde::{Deserialize, Serialize};

/// Anything the graph builder and the search can price edges with.
pub trait CostModel {
    /// Cost of flying the straight segment `from -> to`. Zero for a zero-length segment.
    fn edge_cost(&self, from: Point3, to: Point3) -> f64;

    /// Estimated remaining cost from `from` to `goal`.
    fn heuristic(&self, from: Point3, goal: Point3) -> f64;
}

impl<T: CostModel + ?Sized> CostModel for &T {
    fn edge_cost(&self, from: Point3, to: Point3) -> f64 {
        (**self).edge_cost(from, to)
    }

    fn heuristic(&self, from: Point3, goal: Point3) -> f64 {
        (**self).heuristic(from, goal)
    }
}

/// Power terms of a single physical-model segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerBreakdown {
    pub distance_m: f64,
    pub time_s: f64,
    pub climb_power_w: f64,
    pub drag_n: f64,
    pub thrust_n: f64,
    pub drag_power_w: f64,
    pub downwash_power_w: f64,
    pub total_power_w: f64,
    pub energy_j: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PhysicalCostModel {
    pub vehicle: VehicleProfile,
    pub weights: CostWeights,
    pub heuristic: HeuristicMode,
}

impl PhysicalCostModel {
    pub fn new(vehicle: VehicleProfile, weights: CostWeights, heuristic: HeuristicMode) -> Self {
        Self {
            vehicle,
            weights,
            heuristic,
        }
    }

    fn weight_n(&self) -> f64 {
        self.vehicle.mass_kg() * self.vehicle.gravity_mps2
    }

    fn body_drag_n(&self) -> f64 {
        let v = &self.vehicle;
        0.5 * v.air_density_kg_m3
            * v.cruise_speed_mps
            * v.cruise_speed_mps
            * v.frontal_area_m2
            * v.drag_coefficient
    }

    fn drag_power_w(&self) -> f64 {
        let v = &self.vehicle;
        0.5 * v.air_density_kg_m3 * v.frontal_area_m2 * v.drag_coefficient * v.cruise_speed_mps.powi(3)
    }

    /// Every power term for the segment `from -> to`.
    pub fn breakdown(&self, from: Point3, to: Point3) -> PowerBreakdown {
        let distance = from.distance(&to);
        if distance == 0.0 {
            return PowerBreakdown::default();
        }
        let v = &self.vehicle;
        let speed = v.cruise_speed_mps;
        let sin_angle = ((to.z - from.z) / distance).clamp(-1.0, 1.0);

        let weight = self.weight_n();
        let climb_power = (weight * speed * sin_angle).max(0.0);
        let drag = self.body_drag_n();
        let thrust = (weight * weight + drag * drag + 2.0 * drag * climb_power).sqrt();
        let drag_power = self.drag_power_w();
        let downwash_power = v.induced_power_factor * v.downwash_velocity_mps * thrust;
        let total_power = drag_power + downwash_power + climb_power;
        let time = distance / speed;
        let energy = total_power * time;

        PowerBreakdown {
            distance_m: distance,
            time_s: time,
            climb_power_w: climb_power,
            drag_n: drag,
            thrust_n: thrust,
            drag_power_w: drag_power,
            downwash_power_w: downwash_power,
            total_power_w: total_power,
            energy_j: energy,
            cost: self.weights.k1 * energy + self.weights.k2 * distance,
        }
    }

    /// Cheapest cost per meter of any segment: level flight, no climb power.
    pub fn min_cost_per_meter(&self) -> f64 {
        let v = &self.vehicle;
        let weight = self.weight_n();
        let drag = self.body_drag_n();
        let level_thrust = (weight * weight + drag * drag).sqrt();
        let level_power =
            self.drag_power_w() + v.induced_power_factor * v.downwash_velocity_mps * level_thrust;
        self.weights.k1 * level_power / v.cruise_speed_mps + self.weights.k2
    }
}

impl CostModel for PhysicalCostModel {
    fn edge_cost(&self, from: Point3, to: Point3) -> f64 {
        self.breakdown(from, to).cost
    }

    fn heuristic(&self, from: Point3, goal: Point3) -> f64 {
        match self.heuristic {
            HeuristicMode::Direct => self.edge_cost(from, goal),
            HeuristicMode::LowerBound => from.distance(&goal) * self.min_cost_per_meter(),
            HeuristicMode::Simplified => simplified_cost(&self.vehicle, &self.weights, from, goal),
            HeuristicMode::Zero => 0.0,
        }
    }
}

/// Time and energy of one or more simplified-model segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeEnergy {
    pub time_s: f64,
    pub energy: f64,
}

impl std::ops::AddAssign for TimeEnergy {
    fn add_assign(&mut self, rhs: Self) {
        self.time_s += rhs.time_s;
        self.energy += rhs.energy;
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimplifiedCostModel {
    pub vehicle: VehicleProfile,
    pub weights: CostWeights,
    pub heuristic: HeuristicMode,
}

impl SimplifiedCostModel {
    pub fn new(vehicle: VehicleProfile, weights: CostWeights, heuristic: HeuristicMode) -> Self {
        Self {
            vehicle,
            weights,
            heuristic,
        }
    }

    pub fn breakdown(&self, from: Point3, to: Point3) -> TimeEnergy {
        simplified_breakdown(&self.vehicle, from, to)
    }

    /// Time and energy summed over consecutive waypoints.
    pub fn path_breakdown(&self, points: &[Point3]) -> TimeEnergy {
        let mut total = TimeEnergy::default();
        for pair in points.windows(2) {
            total += self.breakdown(pair[0], pair[1]);
        }
        total
    }

    /// Cheapest cost per meter of straight-line distance over any direction.
    pub fn min_cost_per_meter(&self) -> f64 {
        let v = &self.vehicle;
        let k = &self.weights;
        let horizontal = k.k1 / v.horizontal_speed_mps + k.k2 * v.horizontal_energy_coeff;
        let vertical = k.k1 / v.ascent_speed_mps.max(v.descent_speed_mps)
            + k.k2 * v.vertical_energy_coeff;
        horizontal.min(vertical)
    }
}

impl CostModel for SimplifiedCostModel {
    fn edge_cost(&self, from: Point3, to: Point3) -> f64 {
        simplified_cost(&self.vehicle, &self.weights, from, to)
    }

    fn heuristic(&self, from: Point3, goal: Point3) -> f64 {
        match self.heuristic {
            HeuristicMode::Direct | HeuristicMode::Simplified => self.edge_cost(from, goal),
            HeuristicMode::LowerBound => from.distance(&goal) * self.min_cost_per_meter(),
            HeuristicMode::Zero => 0.0,
        }
    }
}

fn simplified_breakdown(v: &VehicleProfile, from: Point3, to: Point3) -> TimeEnergy {
    let horizontal = from.horizontal_distance(&to);
    let vertical = (to.z - from.z).abs();
    let vertical_speed = if to.z > from.z {
        v.ascent_speed_mps
    } else {
        v.descent_speed_mps
    };
    TimeEnergy {
        time_s: horizontal / v.horizontal_speed_mps + vertical / vertical_speed,
        energy: vertical * v.vertical_energy_coeff + horizontal * v.horizontal_energy_coeff,
    }
}

fn simplified_cost(v: &VehicleProfile, k: &CostWeights, from: Point3, to: Point3) -> f64 {
    let te = simplified_breakdown(v, from, to);
    k.k1 * te.time_s + k.k2 * te.energy
}
