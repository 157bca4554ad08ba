//! Core data models for the planner.

use crate::error::PlannerError;
use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// A point in the planning frame (meters, z up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Horizontal projection.
    pub fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn distance(&self, other: &Point3) -> f64 {
        let d = *other - *self;
        (d.x * d.x + d.y * d.y + d.z * d.z).sqrt()
    }

    pub fn horizontal_distance(&self, other: &Point3) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Hash key matching `==` on all three coordinates (`-0.0` folds onto `0.0`).
    pub(crate) fn key(&self) -> [u64; 3] {
        fn bits(v: f64) -> u64 {
            if v == 0.0 {
                0.0f64.to_bits()
            } else {
                v.to_bits()
            }
        }
        [bits(self.x), bits(self.y), bits(self.z)]
    }
}

impl Sub for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Index of an obstacle in the slice a graph was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub usize);

/// Index of a vertex in a [`crate::visibility::VisibilityGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub usize);

/// Axis-aligned box obstacle.
///
/// Bounds are validated on construction (and on deserialization), so every
/// value of this type satisfies `min <= max` on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 6]", into = "[f64; 6]")]
pub struct Obstacle {
    min: Point3,
    max: Point3,
}

impl Obstacle {
    pub fn new(
        x_min: f64,
        y_min: f64,
        z_min: f64,
        x_max: f64,
        y_max: f64,
        z_max: f64,
    ) -> Result<Self, PlannerError> {
        let bounds = [x_min, y_min, z_min, x_max, y_max, z_max];
        if bounds.iter().any(|v| !v.is_finite()) {
            return Err(PlannerError::InvalidObstacle {
                bounds,
                reason: "bounds must be finite",
            });
        }
        if x_min > x_max || y_min > y_max || z_min > z_max {
            return Err(PlannerError::InvalidObstacle {
                bounds,
                reason: "min exceeds max",
            });
        }
        Ok(Self {
            min: Point3::new(x_min, y_min, z_min),
            max: Point3::new(x_max, y_max, z_max),
        })
    }

    pub fn from_bounds(min: Point3, max: Point3) -> Result<Self, PlannerError> {
        Self::new(min.x, min.y, min.z, max.x, max.y, max.z)
    }

    pub fn min(&self) -> Point3 {
        self.min
    }

    pub fn max(&self) -> Point3 {
        self.max
    }

    pub fn bounds(&self) -> [f64; 6] {
        [
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z,
        ]
    }

    pub fn footprint(&self) -> Footprint {
        Footprint {
            x_min: self.min.x,
            y_min: self.min.y,
            x_max: self.max.x,
            y_max: self.max.y,
        }
    }

    /// Whether a horizontal plane at `z` cuts this box (faces included).
    pub fn spans_height(&self, z: f64) -> bool {
        self.min.z <= z && z <= self.max.z
    }

    /// Inflate horizontally on both sides and upward by `margin`; the base stays put.
    ///
    /// Negative or NaN margins are treated as zero so the result stays a valid box.
    pub fn expanded(&self, margin: f64) -> Obstacle {
        let e = margin.max(0.0);
        Obstacle {
            min: Point3::new(self.min.x - e, self.min.y - e, self.min.z),
            max: Point3::new(self.max.x + e, self.max.y + e, self.max.z + e),
        }
    }

    /// The eight box vertices after moving every face inward by `shrink`.
    pub fn shrunk_vertices(&self, shrink: f64) -> [Point3; 8] {
        let lo = Point3::new(self.min.x + shrink, self.min.y + shrink, self.min.z + shrink);
        let hi = Point3::new(self.max.x - shrink, self.max.y - shrink, self.max.z - shrink);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Strict interior containment.
    pub fn contains_strictly(&self, p: &Point3) -> bool {
        p.x > self.min.x
            && p.x < self.max.x
            && p.y > self.min.y
            && p.y < self.max.y
            && p.z > self.min.z
            && p.z < self.max.z
    }
}

impl TryFrom<[f64; 6]> for Obstacle {
    type Error = PlannerError;

    fn try_from(b: [f64; 6]) -> Result<Self, Self::Error> {
        Obstacle::new(b[0], b[1], b[2], b[3], b[4], b[5])
    }
}

impl From<Obstacle> for [f64; 6] {
    fn from(obstacle: Obstacle) -> Self {
        obstacle.bounds()
    }
}

/// Horizontal projection of an obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Footprint {
    /// Corners in generation order: (min,min), (max,min), (min,max), (max,max).
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.x_min, self.y_min),
            (self.x_max, self.y_min),
            (self.x_min, self.y_max),
            (self.x_max, self.y_max),
        ]
    }

    /// Boundary edges in counter-clockwise order.
    pub fn edges(&self) -> [((f64, f64), (f64, f64)); 4] {
        let a = (self.x_min, self.y_min);
        let b = (self.x_max, self.y_min);
        let c = (self.x_max, self.y_max);
        let d = (self.x_min, self.y_max);
        [(a, b), (b, c), (c, d), (d, a)]
    }

    /// Move every edge inward by `amount`.
    pub fn shrunk(&self, amount: f64) -> Footprint {
        Footprint {
            x_min: self.x_min + amount,
            y_min: self.y_min + amount,
            x_max: self.x_max - amount,
            y_max: self.y_max - amount,
        }
    }

    /// Closed containment test.
    pub fn contains(&self, p: (f64, f64)) -> bool {
        p.0 >= self.x_min && p.0 <= self.x_max && p.1 >= self.y_min && p.1 <= self.y_max
    }

    /// Shrinking past zero width leaves nothing to intersect.
    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }
}

/// What a graph vertex stands for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VertexKind {
    Start,
    Goal,
    /// Footprint corner of `obstacle` lifted to a cut plane.
    Corner {
        obstacle: ObstacleId,
        cut_plane_z: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3,
    #[serde(flatten)]
    pub kind: VertexKind,
}

impl Vertex {
    pub fn start(position: Point3) -> Self {
        Self {
            position,
            kind: VertexKind::Start,
        }
    }

    pub fn goal(position: Point3) -> Self {
        Self {
            position,
            kind: VertexKind::Goal,
        }
    }

    pub fn corner(position: Point3, obstacle: ObstacleId) -> Self {
        Self {
            position,
            kind: VertexKind::Corner {
                obstacle,
                cut_plane_z: position.z,
            },
        }
    }

    /// The obstacle whose footprint corner generated this vertex.
    pub fn owner(&self) -> Option<ObstacleId> {
        match self.kind {
            VertexKind::Corner { obstacle, .. } => Some(obstacle),
            VertexKind::Start | VertexKind::Goal => None,
        }
    }
}
