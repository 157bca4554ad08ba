//! Obstacle fields: plain-text format and random generation.

use crate::error::{PlannerError, Result};
use crate::models::Obstacle;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::debug;

/// Parse one obstacle per line: `x_min y_min z_min x_max y_max z_max`.
///
/// Blank lines and anything after `#` are ignored. Errors carry the 1-based line number.
pub fn parse_obstacles(text: &str) -> Result<Vec<Obstacle>> {
    let mut obstacles = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let mut bounds = [0.0f64; 6];
        let mut count = 0usize;
        for token in content.split_whitespace() {
            if count == bounds.len() {
                return Err(PlannerError::Parse {
                    line,
                    message: "expected 6 numbers, found more".to_string(),
                });
            }
            bounds[count] = token.parse().map_err(|_| PlannerError::Parse {
                line,
                message: format!("invalid number '{token}'"),
            })?;
            count += 1;
        }
        if count < bounds.len() {
            return Err(PlannerError::Parse {
                line,
                message: format!("expected 6 numbers, found {count}"),
            });
        }

        let obstacle = Obstacle::try_from(bounds).map_err(|err| PlannerError::Parse {
            line,
            message: err.to_string(),
        })?;
        obstacles.push(obstacle);
    }
    Ok(obstacles)
}

/// One line per obstacle, one decimal place per coordinate.
pub fn format_obstacles(obstacles: &[Obstacle]) -> String {
    let mut out = String::new();
    for obstacle in obstacles {
        let b = obstacle.bounds();
        let _ = writeln!(
            out,
            "{:.1} {:.1} {:.1} {:.1} {:.1} {:.1}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        );
    }
    out
}

/// Euclidean gap between two boxes; zero when they overlap on every axis.
pub fn box_gap(a: &Obstacle, b: &Obstacle) -> f64 {
    let (a_min, a_max, b_min, b_max) = (a.min(), a.max(), b.min(), b.max());
    let axis_gap = |lo1: f64, hi1: f64, lo2: f64, hi2: f64| {
        let center = ((lo1 + hi1) / 2.0 - (lo2 + hi2) / 2.0).abs();
        (center - ((hi1 - lo1) / 2.0 + (hi2 - lo2) / 2.0)).max(0.0)
    };
    let dx = axis_gap(a_min.x, a_max.x, b_min.x, b_max.x);
    let dy = axis_gap(a_min.y, a_max.y, b_min.y, b_max.y);
    let dz = axis_gap(a_min.z, a_max.z, b_min.z, b_max.z);
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Bounds of a random obstacle field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Footprint origins are drawn from `[0, extent]` on both axes
    pub extent: f64,
    pub side_min: f64,
    pub side_max: f64,
    pub height_min: f64,
    pub height_max: f64,
    /// Draws allowed before giving up
    pub max_attempts: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            extent: 720.0,
            side_min: 30.0,
            side_max: 100.0,
            height_min: 10.0,
            height_max: 50.0,
            max_attempts: 100_000,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<()> {
        let ranges = [
            ("extent", 0.0, self.extent),
            ("side", self.side_min, self.side_max),
            ("height", self.height_min, self.height_max),
        ];
        for (name, lo, hi) in ranges {
            if !(lo.is_finite() && hi.is_finite() && lo >= 0.0 && lo <= hi) {
                return Err(PlannerError::InvalidConfig(format!(
                    "{name} range [{lo}, {hi}] is invalid"
                )));
            }
        }
        Ok(())
    }
}

pub const DEFAULT_OBSTACLE_COUNT: usize = 40;
pub const DEFAULT_MIN_GAP: f64 = 14.0;

fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Draw `count` ground-standing boxes at least `min_gap` apart.
pub fn generate_obstacles<R: Rng + ?Sized>(
    count: usize,
    min_gap: f64,
    field: &FieldConfig,
    rng: &mut R,
) -> Result<Vec<Obstacle>> {
    field.validate()?;
    let mut obstacles: Vec<Obstacle> = Vec::with_capacity(count);
    let mut attempts = 0usize;

    while obstacles.len() < count {
        if attempts == field.max_attempts {
            return Err(PlannerError::FieldExhausted {
                placed: obstacles.len(),
                requested: count,
            });
        }
        attempts += 1;

        let x_min = round_tenth(rng.random_range(0.0..=field.extent));
        let y_min = round_tenth(rng.random_range(0.0..=field.extent));
        let x_max = round_tenth(x_min + rng.random_range(field.side_min..=field.side_max));
        let y_max = round_tenth(y_min + rng.random_range(field.side_min..=field.side_max));
        let z_max = round_tenth(rng.random_range(field.height_min..=field.height_max));
        let candidate = Obstacle::new(x_min, y_min, 0.0, x_max, y_max, z_max)?;

        if obstacles.iter().all(|o| box_gap(&candidate, o) >= min_gap) {
            obstacles.push(candidate);
        }
    }

    debug!(count, attempts, "obstacle field generated");
    Ok(obstacles)
}
